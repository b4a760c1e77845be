//! Reading name mappings in the `.srg` format.
//!
//! Only the package (`PK:`) and class (`CL:`) lines contribute to a
//! [`NameMapping`]; field (`FD:`) and method (`MD:`) lines are recognized
//! but ignored, member renames are outside what the mapping carries.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use anyhow::{anyhow, bail, Context, Result};
use rachis::name::{ClassName, PackageName};
use crate::mapping::NameMapping;

/// Reads an `.srg` file, by opening the file given by the path.
///
/// ```
/// # use pretty_assertions::assert_eq;
/// use std::path::Path;
///
/// let path = Path::new("tests/read_file_input.srg");
/// let mapping = preen::srg::read_file(path).unwrap();
///
/// assert_eq!(mapping.packages.len(), 1);
/// assert_eq!(mapping.classes.len(), 2);
/// ```
pub fn read_file(path: impl AsRef<Path>) -> Result<NameMapping> {
	read(File::open(&path)?)
		.with_context(|| anyhow!("failed to read mapping file {:?} as srg file", path.as_ref()))
}

/// Reads the srg format, from the given reader.
///
/// ```
/// # use pretty_assertions::assert_eq;
/// let string = "\
/// PK: a org/example
/// CL: a/b org/example/Widget
/// FD: a/b/c org/example/Widget/count
/// MD: a/b/d (I)V org/example/Widget/resize (I)V
/// ";
///
/// let reader = &mut string.as_bytes();
/// let mapping = preen::srg::read(reader).unwrap();
///
/// assert_eq!(mapping.packages.len(), 1);
/// assert_eq!(mapping.classes.len(), 1);
/// ```
pub fn read(reader: impl Read) -> Result<NameMapping> {
	let mut mapping = NameMapping::default();

	for (line_number, line) in BufReader::new(reader).lines().enumerate() {
		let line = line?;

		let line = match line.find('#') {
			Some(index) => &line[..index],
			None => &line,
		};

		parse_line(&mut mapping, line)
			.with_context(|| anyhow!("in line {}: {line:?}", line_number + 1))?;
	}

	Ok(mapping)
}

fn parse_line(mapping: &mut NameMapping, line: &str) -> Result<()> {
	let mut fields = line.split_whitespace();

	let Some(kind) = fields.next() else {
		return Ok(());
	};

	match kind {
		"PK:" => {
			let (from, to) = two_fields(fields)?;
			if from == "." {
				// `.` is the default package, which prefix rewriting can't act on
			} else if to == "." {
				bail!("cannot map package {from:?} into the default package");
			} else {
				let from = PackageName::try_from(from)?;
				let to = PackageName::try_from(to)?;
				mapping.packages.insert(from, to)?;
			}
		},
		"CL:" => {
			let (from, to) = two_fields(fields)?;
			let from = ClassName::try_from(from)?;
			let to = ClassName::try_from(to)?;
			mapping.classes.insert(from, to)?;
		},
		// member mappings are not consumed here
		"FD:" | "MD:" => {},
		kind => bail!("unknown mapping kind {kind:?}"),
	}

	Ok(())
}

fn two_fields<'a>(mut fields: impl Iterator<Item=&'a str>) -> Result<(&'a str, &'a str)> {
	let Some(a) = fields.next() else {
		bail!("expected two names, got none");
	};
	let Some(b) = fields.next() else {
		bail!("expected two names, got only {a:?}");
	};
	if let Some(extra) = fields.next() {
		bail!("expected two names, got extra content {extra:?}");
	}
	Ok((a, b))
}

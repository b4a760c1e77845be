//! Jars as containers of class files.

use std::fmt::{Debug, Formatter};
use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;
use anyhow::{anyhow, bail, Context, Result};
use indexmap::{IndexMap, IndexSet};
use log::trace;
use zip::ZipArchive;
use zip::result::ZipError;
use rachis::ClassFile;
use rachis::name::{ClassName, ClassNameSlice};

/// A jar, opened as a zip archive.
///
/// The class list is scanned once when the jar is opened; the entries
/// themselves are read on demand. Parsed [`ClassFile`]s are kept around,
/// raw bytes from [`Jar::class_bytes`] are not.
pub struct Jar<R: Read + Seek> {
	name: String,
	archive: ZipArchive<R>,
	class_names: IndexSet<ClassName>,
	structures: IndexMap<ClassName, ClassFile>,
}

/// [`Debug`] only prints the name and the number of classes, not the archive.
impl<R: Read + Seek> Debug for Jar<R> {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Jar")
			.field("name", &self.name)
			.field("classes", &self.class_names.len())
			.finish_non_exhaustive()
	}
}

impl Jar<File> {
	/// Opens a jar from a path.
	pub fn open(path: impl AsRef<Path>) -> Result<Jar<File>> {
		let path = path.as_ref();
		let file = File::open(path)
			.with_context(|| anyhow!("could not open file {path:?}"))?;
		Jar::new(path.display().to_string(), file)
	}
}

impl<R: Read + Seek> Jar<R> {
	/// Reads the zip central directory and records, in entry order, the name
	/// of every `.class` entry. The `name` is arbitrary and only used in
	/// error messages.
	pub fn new(name: impl Into<String>, reader: R) -> Result<Jar<R>> {
		let name = name.into();
		let archive = ZipArchive::new(reader)
			.with_context(|| anyhow!("failed to read zip archive from {name}"))?;

		let mut class_names = IndexSet::new();
		for file_name in archive.file_names() {
			if let Some(class_name) = file_name.strip_suffix(".class") {
				let class_name = ClassName::try_from(class_name)
					.with_context(|| anyhow!("invalid class file name {file_name:?} in {name}"))?;
				class_names.insert(class_name);
			}
		}

		Ok(Jar { name, archive, class_names, structures: IndexMap::new() })
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	/// The classes stored in this jar, in the order their entries appear in
	/// the archive.
	pub fn class_names(&self) -> impl Iterator<Item=&ClassNameSlice> {
		self.class_names.iter().map(ClassName::as_slice)
	}

	pub fn has_class(&self, name: &ClassNameSlice) -> bool {
		self.class_names.contains(name)
	}

	/// Reads the raw bytes of the given class, or `Ok(None)` if this jar has
	/// no such class.
	pub fn class_bytes(&mut self, name: &ClassNameSlice) -> Result<Option<Vec<u8>>> {
		if !self.class_names.contains(name) {
			return Ok(None);
		}

		let path = format!("{name}.class");
		let mut entry = match self.archive.by_name(&path) {
			Ok(entry) => entry,
			Err(ZipError::FileNotFound) => return Ok(None),
			Err(e) => bail!("could not get file {path} from zip: {e}"),
		};

		let mut data = Vec::with_capacity(usize::try_from(entry.size()).unwrap_or(0));
		entry.read_to_end(&mut data)
			.with_context(|| anyhow!("failed to read {path} from {}", self.name))?;
		Ok(Some(data))
	}

	/// The parsed structure of the given class, or `Ok(None)` if this jar has
	/// no such class.
	///
	/// Each class is parsed at most once per [`Jar`].
	pub fn structure(&mut self, name: &ClassNameSlice) -> Result<Option<&ClassFile>> {
		if !self.class_names.contains(name) {
			return Ok(None);
		}

		if !self.structures.contains_key(name) {
			trace!("parsing class structure of {name} from {}", self.name);

			let bytes = self.class_bytes(name)?
				.ok_or_else(|| anyhow!("class {name} vanished from {}", self.name))?;
			let class = ClassFile::parse(bytes)
				.with_context(|| anyhow!("failed to parse class {name} from {}", self.name))?;

			self.structures.insert(name.to_owned(), class);
		}

		Ok(self.structures.get(name))
	}

	/// The `Main-Class` manifest attribute, as an internal name.
	///
	/// `Ok(None)` if the jar has no manifest or the manifest no `Main-Class`.
	pub fn main_class(&mut self) -> Result<Option<ClassName>> {
		let mut entry = match self.archive.by_name("META-INF/MANIFEST.MF") {
			Ok(entry) => entry,
			Err(ZipError::FileNotFound) => return Ok(None),
			Err(e) => bail!("could not get manifest from zip: {e}"),
		};

		let mut manifest = String::new();
		entry.read_to_string(&mut manifest)
			.with_context(|| anyhow!("failed to read manifest of {}", self.name))?;

		let Some(value) = manifest_attribute(&manifest, "Main-Class") else {
			return Ok(None);
		};

		let name = ClassName::try_from(value.replace('.', "/"))
			.with_context(|| anyhow!("manifest of {} declares an invalid main class", self.name))?;
		Ok(Some(name))
	}
}

/// Looks up an attribute in the main section of a `MANIFEST.MF`, undoing the
/// line folding long values come with.
fn manifest_attribute(manifest: &str, key: &str) -> Option<String> {
	let mut lines = manifest.lines().peekable();
	while let Some(line) = lines.next() {
		// an empty line ends the main section
		if line.is_empty() {
			break;
		}

		let Some(rest) = line.strip_prefix(key) else {
			continue;
		};
		let Some(value) = rest.strip_prefix(':') else {
			continue;
		};

		let mut value = value.trim().to_owned();
		// continuation lines start with a single space
		while let Some(continuation) = lines.peek().and_then(|line| line.strip_prefix(' ')) {
			value.push_str(continuation.trim_end());
			lines.next();
		}
		return Some(value);
	}
	None
}

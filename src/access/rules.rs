//! Reading access transformer configurations.
//!
//! Each non-empty line is an access modifier followed by a target, separated
//! by a single space. The modifier is one of `public`, `protected`,
//! `private`, anything else meaning package-private, optionally suffixed
//! with `+f` or `-f` to set or clear the `final` flag. The target is a class
//! name, a `.`-joined class and field name, or a `.`-joined class and method
//! name with the descriptor attached, like `com/example/Foo.run()V`.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use anyhow::{anyhow, bail, Context, Result};
use indexmap::IndexMap;
use rachis::flags::{self, AccessFlags};
use rachis::name::{BinaryName, BinaryNameSlice};

/// How visible a class, field or method is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
	Private,
	/// Package-private, written without any modifier in source.
	#[default]
	Default,
	Protected,
	Public,
}

impl Visibility {
	/// Reads the visibility out of an access flags word.
	pub fn from_flags(access_flags: AccessFlags) -> Result<Visibility> {
		let bits = u16::from(access_flags) & flags::VISIBILITY_MASK;
		Ok(match bits {
			0 => Visibility::Default,
			flags::ACC_PUBLIC => Visibility::Public,
			flags::ACC_PRIVATE => Visibility::Private,
			flags::ACC_PROTECTED => Visibility::Protected,
			_ => bail!("illegal visibility bits {bits:#06x}"),
		})
	}

	/// Widens `current` up to `self`, never narrowing it.
	///
	/// ```
	/// # use pretty_assertions::assert_eq;
	/// use preen::access::Visibility;
	///
	/// assert_eq!(Visibility::Public.widen(Visibility::Private), Visibility::Public);
	/// assert_eq!(Visibility::Private.widen(Visibility::Protected), Visibility::Protected);
	/// ```
	pub fn widen(self, current: Visibility) -> Visibility {
		if current.rank() >= self.rank() { current } else { self }
	}

	fn rank(self) -> u8 {
		match self {
			Visibility::Private => 0,
			Visibility::Default => 1,
			Visibility::Protected => 2,
			Visibility::Public => 3,
		}
	}

	pub(crate) fn bits(self) -> u16 {
		match self {
			Visibility::Private => flags::ACC_PRIVATE,
			Visibility::Default => 0,
			Visibility::Protected => flags::ACC_PROTECTED,
			Visibility::Public => flags::ACC_PUBLIC,
		}
	}
}

/// What a rule does to the `final` flag of its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FinalAction {
	#[default]
	NoChange,
	/// The modifier carried a `+f` suffix.
	ForceFinal,
	/// The modifier carried a `-f` suffix.
	ForceNonFinal,
}

/// What part of a class a rule applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleTarget {
	/// The access flags of the class itself.
	Class,
	/// The fields of the matching name; the name `*` matches every field.
	Field { name: String },
	/// The methods matching both name and descriptor; the name `*` matches
	/// every method regardless of its descriptor.
	Method { name: String, descriptor: String },
}

/// One parsed access transformer line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessRule {
	pub visibility: Visibility,
	pub final_action: FinalAction,
	pub target: RuleTarget,
}

/// The rules of an access transformer configuration, grouped by the class
/// they apply to.
///
/// The group keys are binary names, with dots, no matter which spelling the
/// configuration lines used.
#[derive(Debug, Clone, Default)]
pub struct AccessRuleSet {
	rules: IndexMap<BinaryName, Vec<AccessRule>>,
}

impl AccessRuleSet {
	/// Gives the rules targeting the given class, in file order.
	pub fn for_class(&self, class: &BinaryNameSlice) -> Option<&[AccessRule]> {
		self.rules.get(class).map(Vec::as_slice)
	}

	pub fn is_empty(&self) -> bool {
		self.rules.is_empty()
	}
}

/// Reads an access transformer configuration, by opening the file given by
/// the path.
///
/// ```
/// use std::path::Path;
///
/// let path = Path::new("tests/read_file_input.cfg");
/// let rules = preen::access::read_file(path).unwrap();
///
/// assert!(!rules.is_empty());
/// ```
pub fn read_file(path: impl AsRef<Path>) -> Result<AccessRuleSet> {
	read(File::open(&path)?)
		.with_context(|| anyhow!("failed to read access transformer file {:?}", path.as_ref()))
}

/// Reads an access transformer configuration, from the given reader.
///
/// ```
/// # use pretty_assertions::assert_eq;
/// use rachis::name::BinaryNameSlice;
///
/// let string = "\
/// ## widen what the patches touch
/// public com/example/Foo.bar
/// protected-f com/example/Foo
/// ";
///
/// let reader = &mut string.as_bytes();
/// let rules = preen::access::read(reader).unwrap();
///
/// let class: &BinaryNameSlice = "com.example.Foo".try_into().unwrap();
/// assert_eq!(rules.for_class(class).map(<[_]>::len), Some(2));
/// ```
pub fn read(reader: impl Read) -> Result<AccessRuleSet> {
	let mut rules = AccessRuleSet::default();

	for (line_number, line) in BufReader::new(reader).lines().enumerate() {
		let line = line?;

		let line = match line.find('#') {
			Some(index) => &line[..index],
			None => &line,
		};

		if let Some((owner, rule)) = parse_line(line)
			.with_context(|| anyhow!("in line {}: {line:?}", line_number + 1))?
		{
			rules.rules.entry(owner).or_default().push(rule);
		}
	}

	Ok(rules)
}

fn parse_line(line: &str) -> Result<Option<(BinaryName, AccessRule)>> {
	let line = line.trim();
	if line.is_empty() {
		return Ok(None);
	}

	let fields: Vec<&str> = line.split(' ').collect();
	let (modifier, target) = match fields[..] {
		[modifier, target] => (modifier, target),
		[modifier] => bail!("expected an access modifier and a target, got only {modifier:?}"),
		_ => bail!("expected an access modifier and a target, got {} fields", fields.len()),
	};

	let (modifier, final_action) = if let Some(modifier) = modifier.strip_suffix("-f") {
		(modifier, FinalAction::ForceNonFinal)
	} else if let Some(modifier) = modifier.strip_suffix("+f") {
		(modifier, FinalAction::ForceFinal)
	} else {
		(modifier, FinalAction::NoChange)
	};

	// an unrecognized modifier means package-private, not an error
	let visibility = if modifier.starts_with("public") {
		Visibility::Public
	} else if modifier.starts_with("private") {
		Visibility::Private
	} else if modifier.starts_with("protected") {
		Visibility::Protected
	} else {
		Visibility::default()
	};

	let (owner, member) = match target.split_once('.') {
		Some((owner, member)) => {
			// anything after a second `.` in the target is ignored
			let member = member.split_once('.').map_or(member, |(member, _)| member);
			(owner, Some(member))
		},
		None => (target, None),
	};

	// the group key is the binary spelling, even for `/` separated targets
	let owner = BinaryName::try_from(owner.replace('/', "."))
		.with_context(|| anyhow!("invalid owner class name in {target:?}"))?;

	let rule_target = match member {
		None => RuleTarget::Class,
		Some(member) => match member.find('(') {
			// the method descriptor starts at the `(`
			Some(index) if index > 0 => RuleTarget::Method {
				name: member[..index].to_owned(),
				descriptor: member[index..].to_owned(),
			},
			_ => RuleTarget::Field { name: member.to_owned() },
		},
	};

	Ok(Some((owner, AccessRule {
		visibility,
		final_action,
		target: rule_target,
	})))
}

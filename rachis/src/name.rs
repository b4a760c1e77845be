//! Typed names for classes, packages, fields and methods.
//!
//! Class and package names come in two spellings: the internal, slash
//! separated form (`com/example/Foo`), and the binary, dot separated form
//! (`com.example.Foo`). These are distinct types so that a name in the wrong
//! spelling cannot be passed where the other one is required; convert with
//! [`ClassNameSlice::to_binary`] and [`BinaryNameSlice::to_internal`].

use std::fmt::{Display, Formatter};
use anyhow::bail;
use crate::macros::{make_display, make_string_str_like};

fn is_valid_internal_form(s: &str) -> bool {
	!s.is_empty() && s.split('/').all(|part| !part.is_empty()) && !s.contains(['.', ';', '['])
}

fn is_valid_binary_form(s: &str) -> bool {
	!s.is_empty() && s.split('.').all(|part| !part.is_empty()) && !s.contains(['/', ';', '['])
}

make_string_str_like!(
	/// A class name in internal form, i.e. with the complete package path
	/// written out and using slashes, like `java/lang/Thread`.
	///
	/// ```
	/// use rachis::name::ClassName;
	/// let java_lang_thread: ClassName = "java/lang/Thread".try_into().unwrap();
	/// ```
	pub ClassName(String);
	/// A [`ClassName`] slice.
	pub ClassNameSlice(str);
	is_valid(s) = if is_valid_internal_form(s) {
		Ok(())
	} else {
		bail!("invalid class name: must consist out of `/` separated non-empty parts, and not contain any of `.`, `;`, `[`");
	};
);
make_display!(ClassName, ClassNameSlice);

make_string_str_like!(
	/// A class name in binary form, i.e. with the complete package path
	/// written out and using dots, like `java.lang.Thread`.
	pub BinaryName(String);
	/// A [`BinaryName`] slice.
	pub BinaryNameSlice(str);
	is_valid(s) = if is_valid_binary_form(s) {
		Ok(())
	} else {
		bail!("invalid binary class name: must consist out of `.` separated non-empty parts, and not contain any of `/`, `;`, `[`");
	};
);
make_display!(BinaryName, BinaryNameSlice);

make_string_str_like!(
	/// A package path in internal form, using slashes, like `java/lang`.
	pub PackageName(String);
	/// A [`PackageName`] slice.
	pub PackageNameSlice(str);
	is_valid(s) = if is_valid_internal_form(s) {
		Ok(())
	} else {
		bail!("invalid package name: must consist out of `/` separated non-empty parts, and not contain any of `.`, `;`, `[`");
	};
);
make_display!(PackageName, PackageNameSlice);

impl ClassNameSlice {
	/// Converts to the binary, dot separated spelling.
	///
	/// ```
	/// # use pretty_assertions::assert_eq;
	/// use rachis::name::ClassName;
	///
	/// let name: ClassName = "com/example/Foo".try_into()?;
	/// assert_eq!(name.to_binary().as_inner(), "com.example.Foo");
	/// # Ok::<(), anyhow::Error>(())
	/// ```
	pub fn to_binary(&self) -> BinaryName {
		// SAFETY: Replacing every `/` of a valid class name with `.` gives a valid binary name.
		unsafe { BinaryName::from_inner_unchecked(self.as_inner().replace('/', ".")) }
	}

	/// Splits into the package and the simple class name.
	///
	/// Classes in the default package have no package to split off.
	///
	/// ```
	/// # use pretty_assertions::assert_eq;
	/// use rachis::name::ClassName;
	///
	/// let name: ClassName = "com/example/Foo".try_into()?;
	/// let (package, simple_name) = name.split_package().unwrap();
	/// assert_eq!(package.as_inner(), "com/example");
	/// assert_eq!(simple_name, "Foo");
	///
	/// let name: ClassName = "Foo".try_into()?;
	/// assert_eq!(name.split_package(), None);
	/// # Ok::<(), anyhow::Error>(())
	/// ```
	pub fn split_package(&self) -> Option<(&PackageNameSlice, &str)> {
		self.as_inner().rsplit_once('/')
			.map(|(package, simple_name)| {
				// SAFETY: The part of a valid class name before its last `/` is a valid package name.
				(unsafe { PackageNameSlice::from_inner_unchecked(package) }, simple_name)
			})
	}
}

impl BinaryNameSlice {
	/// Converts to the internal, slash separated spelling.
	///
	/// ```
	/// # use pretty_assertions::assert_eq;
	/// use rachis::name::BinaryName;
	///
	/// let name: BinaryName = "com.example.Foo".try_into()?;
	/// assert_eq!(name.to_internal().as_inner(), "com/example/Foo");
	/// # Ok::<(), anyhow::Error>(())
	/// ```
	pub fn to_internal(&self) -> ClassName {
		// SAFETY: Replacing every `.` of a valid binary name with `/` gives a valid class name.
		unsafe { ClassName::from_inner_unchecked(self.as_inner().replace('.', "/")) }
	}
}

impl PackageName {
	/// Joins a package and a simple class name into a class name.
	pub fn join_simple_name(&self, simple_name: &str) -> ClassName {
		// SAFETY: A valid package name, a `/` and a name part without `/`, `.`, `;`, `[` form a valid class name.
		unsafe { ClassName::from_inner_unchecked(format!("{}/{}", self.as_slice(), simple_name)) }
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldName(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldDescriptor(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodName(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodDescriptor(pub String);

macro_rules! impl_member_name {
	($name:ident) => {
		impl $name {
			pub fn as_str(&self) -> &str {
				&self.0
			}
		}

		impl From<String> for $name {
			fn from(value: String) -> Self {
				$name(value)
			}
		}
		impl From<$name> for String {
			fn from(value: $name) -> Self {
				value.0
			}
		}

		impl Display for $name {
			fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
				Display::fmt(&self.0, f)
			}
		}
	}
}

impl_member_name!(FieldName);
impl_member_name!(FieldDescriptor);
impl_member_name!(MethodName);
impl_member_name!(MethodDescriptor);

#[cfg(test)]
mod testing {
	use pretty_assertions::assert_eq;
	use super::*;

	#[test]
	fn class_name_validity() {
		assert!(ClassName::is_valid("java/lang/Object"));
		assert!(ClassName::is_valid("Foo"));
		assert!(ClassName::is_valid("a/b$c/D$E"));

		assert!(!ClassName::is_valid(""));
		assert!(!ClassName::is_valid("java/lang/"));
		assert!(!ClassName::is_valid("/java"));
		assert!(!ClassName::is_valid("java//lang"));
		assert!(!ClassName::is_valid("java.lang.Object"));
		assert!(!ClassName::is_valid("[Ljava/lang/Object;"));
		assert!(!ClassName::is_valid("Ljava/lang/Object;"));
	}

	#[test]
	fn binary_name_validity() {
		assert!(BinaryName::is_valid("java.lang.Object"));
		assert!(BinaryName::is_valid("Foo"));

		assert!(!BinaryName::is_valid(""));
		assert!(!BinaryName::is_valid("java.lang."));
		assert!(!BinaryName::is_valid("java/lang/Object"));
	}

	#[test]
	fn conversions_roundtrip() {
		let internal: ClassName = "com/example/Foo$Bar".to_owned().try_into().unwrap();
		let binary = internal.to_binary();
		assert_eq!(binary.as_inner(), "com.example.Foo$Bar");
		assert_eq!(binary.to_internal(), internal);
	}

	#[test]
	fn split_and_join() {
		let name: ClassName = "a/b/C".to_owned().try_into().unwrap();
		let (package, simple_name) = name.split_package().unwrap();
		assert_eq!(package.as_inner(), "a/b");
		assert_eq!(simple_name, "C");
		assert_eq!(package.to_owned().join_simple_name(simple_name), name);
	}
}

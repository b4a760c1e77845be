//! Translating single class names between the two namespaces of a
//! [`NameMapping`].

use rachis::name::{ClassName, ClassNameSlice};
use crate::mapping::NameMapping;

/// Which way through a [`NameMapping`] a lookup goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
	Forward,
	Backward,
}

impl NameMapping {
	/// Rewrites one class name.
	///
	/// An exact match in the class table wins. Otherwise the package prefix
	/// is rewritten and the simple name kept. A name matching neither table
	/// is returned unchanged: such names live outside the mapped namespace,
	/// like the JDK classes.
	///
	/// ```
	/// # use pretty_assertions::assert_eq;
	/// use preen::mapper::Direction;
	/// use preen::mapping::NameMapping;
	///
	/// let mut mapping = NameMapping::default();
	/// mapping.classes.insert("a/b".try_into()?, "org/example/Widget".try_into()?)?;
	/// mapping.packages.insert("a".try_into()?, "org/example".try_into()?)?;
	///
	/// let widget = mapping.map_type_name(Direction::Forward, "a/b".try_into()?);
	/// assert_eq!(widget.as_inner(), "org/example/Widget");
	///
	/// // no class entry for a/c, the package prefix gets rewritten
	/// let other = mapping.map_type_name(Direction::Forward, "a/c".try_into()?);
	/// assert_eq!(other.as_inner(), "org/example/c");
	///
	/// let jdk = mapping.map_type_name(Direction::Backward, "java/lang/Object".try_into()?);
	/// assert_eq!(jdk.as_inner(), "java/lang/Object");
	/// # Ok::<(), anyhow::Error>(())
	/// ```
	pub fn map_type_name(&self, direction: Direction, name: &ClassNameSlice) -> ClassName {
		let class_override = match direction {
			Direction::Forward => self.classes.get(name),
			Direction::Backward => self.classes.get_back(name),
		};
		if let Some(mapped) = class_override {
			return mapped.clone();
		}

		if let Some((package, simple_name)) = name.split_package() {
			let mapped_package = match direction {
				Direction::Forward => self.packages.get(package),
				Direction::Backward => self.packages.get_back(package),
			};
			if let Some(mapped_package) = mapped_package {
				return mapped_package.join_simple_name(simple_name);
			}
		}

		name.to_owned()
	}
}

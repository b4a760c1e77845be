//! Providers answering direct-supertype queries.

use std::io::{Read, Seek};
use anyhow::Result;
use indexmap::IndexMap;
use nestbox::Jar;
use rachis::name::{ClassName, ClassNameSlice};
use crate::mapper::Direction;
use crate::mapping::NameMapping;

/// Answers "what are the direct supertypes of class X".
///
/// `Ok(None)` means the class is unknown to this provider. That is different
/// from `Ok(Some(vec![]))`, a class known to have no parents at all, like
/// `java/lang/Object`.
pub trait InheritanceProvider {
	/// The direct supertypes of the class: the super class first, then the
	/// direct superinterfaces in declaration order.
	fn get_parents(&self, class: &ClassNameSlice) -> Result<Option<Vec<ClassName>>>;
}

impl<P: InheritanceProvider> InheritanceProvider for Vec<P> {
	fn get_parents(&self, class: &ClassNameSlice) -> Result<Option<Vec<ClassName>>> {
		for provider in self {
			if let Some(parents) = provider.get_parents(class)? {
				return Ok(Some(parents));
			}
		}
		Ok(None)
	}
}

impl<P: InheritanceProvider + ?Sized> InheritanceProvider for &P {
	fn get_parents(&self, class: &ClassNameSlice) -> Result<Option<Vec<ClassName>>> {
		(**self).get_parents(class)
	}
}

impl<P: InheritanceProvider + ?Sized> InheritanceProvider for Box<P> {
	fn get_parents(&self, class: &ClassNameSlice) -> Result<Option<Vec<ClassName>>> {
		(**self).get_parents(class)
	}
}

/// A provider that knows no classes.
pub struct NoInheritanceProvider;

impl NoInheritanceProvider {
	pub fn new() -> &'static NoInheritanceProvider {
		static INSTANCE: NoInheritanceProvider = NoInheritanceProvider;
		&INSTANCE
	}
}

impl InheritanceProvider for NoInheritanceProvider {
	fn get_parents(&self, _class: &ClassNameSlice) -> Result<Option<Vec<ClassName>>> {
		Ok(None)
	}
}

/// Parents resolved against the classes stored in a jar.
#[derive(Debug)]
pub struct JarInheritanceProvider {
	parents: IndexMap<ClassName, Vec<ClassName>>,
}

impl JarInheritanceProvider {
	/// Indexes the super class and interfaces of every class in the jar.
	///
	/// To resolve against several jars, build one provider per jar and put
	/// them in a `Vec`.
	pub fn from_jar<R: Read + Seek>(jar: &mut Jar<R>) -> Result<JarInheritanceProvider> {
		let names: Vec<ClassName> = jar.class_names().map(|name| name.to_owned()).collect();

		let mut parents = IndexMap::new();
		for name in names {
			let Some(class) = jar.structure(&name)? else {
				continue;
			};

			let mut class_parents = Vec::new();
			if let Some(super_class) = &class.super_class {
				class_parents.push(super_class.clone());
			}
			class_parents.extend(class.interfaces.iter().cloned());

			parents.insert(name, class_parents);
		}

		Ok(JarInheritanceProvider { parents })
	}
}

impl InheritanceProvider for JarInheritanceProvider {
	fn get_parents(&self, class: &ClassNameSlice) -> Result<Option<Vec<ClassName>>> {
		Ok(self.parents.get(class).cloned())
	}
}

/// Decorates a provider to answer queries in the other namespace.
///
/// The wrapped provider resolves names in the namespace the [`NameMapping`]
/// maps to; queries and answers of the decorator are in the namespace it
/// maps from. Names neither table covers pass through unchanged in both
/// directions.
///
/// Holds only the two references it is constructed from; it is safe to share
/// across threads resolving different classes.
#[derive(Debug)]
pub struct RemappingInheritanceProvider<'a, P> {
	inner: &'a P,
	mapping: &'a NameMapping,
}

impl<'a, P> RemappingInheritanceProvider<'a, P> {
	pub fn new(inner: &'a P, mapping: &'a NameMapping) -> RemappingInheritanceProvider<'a, P> {
		RemappingInheritanceProvider { inner, mapping }
	}
}

impl<P: InheritanceProvider> InheritanceProvider for RemappingInheritanceProvider<'_, P> {
	fn get_parents(&self, class: &ClassNameSlice) -> Result<Option<Vec<ClassName>>> {
		let inner_name = self.mapping.map_type_name(Direction::Forward, class);

		let Some(parents) = self.inner.get_parents(&inner_name)? else {
			// unknown stays unknown, an empty list would claim "no parents"
			return Ok(None);
		};

		Ok(Some(parents.iter()
			.map(|parent| self.mapping.map_type_name(Direction::Backward, parent))
			.collect()))
	}
}

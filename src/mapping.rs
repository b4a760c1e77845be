//! The bidirectional name tables remapping is built on.

use std::fmt::Debug;
use std::hash::Hash;
use anyhow::{bail, Result};
use indexmap::{Equivalent, IndexMap};
use rachis::name::{ClassName, PackageName};

/// A bijective map.
///
/// Insertion checks both directions, so inverse lookups via
/// [`BiMap::get_back`] are always unambiguous.
#[derive(Debug, Clone)]
pub struct BiMap<T> {
	forward: IndexMap<T, T>,
	backward: IndexMap<T, T>,
}

impl<T> Default for BiMap<T> {
	fn default() -> BiMap<T> {
		BiMap { forward: IndexMap::new(), backward: IndexMap::new() }
	}
}

impl<T: Hash + Eq + Clone + Debug> BiMap<T> {
	pub fn new() -> BiMap<T> {
		BiMap::default()
	}

	/// Adds a `key <-> value` pair.
	///
	/// A bijection can't hold two pairs sharing a key or sharing a value, so
	/// duplicates on either side are rejected.
	pub fn insert(&mut self, key: T, value: T) -> Result<()> {
		if let Some(old) = self.forward.get(&key) {
			bail!("duplicate key {key:?}: already mapped to {old:?}");
		}
		if let Some(old) = self.backward.get(&value) {
			bail!("duplicate value {value:?}: already mapped from {old:?}");
		}

		self.forward.insert(key.clone(), value.clone());
		self.backward.insert(value, key);
		Ok(())
	}

	pub fn get<Q>(&self, key: &Q) -> Option<&T>
	where
		Q: ?Sized + Hash + Equivalent<T>,
	{
		self.forward.get(key)
	}

	/// The inverse lookup to [`BiMap::get`].
	pub fn get_back<Q>(&self, value: &Q) -> Option<&T>
	where
		Q: ?Sized + Hash + Equivalent<T>,
	{
		self.backward.get(value)
	}

	pub fn len(&self) -> usize {
		self.forward.len()
	}

	pub fn is_empty(&self) -> bool {
		self.forward.is_empty()
	}
}

/// The package and class tables between two namespaces.
///
/// Built once, for instance with [`crate::srg::read_file`], and shared
/// read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct NameMapping {
	pub packages: BiMap<PackageName>,
	pub classes: BiMap<ClassName>,
}

#[cfg(test)]
mod testing {
	use pretty_assertions::assert_eq;
	use anyhow::Result;
	use super::BiMap;

	#[test]
	fn get_works_both_ways() -> Result<()> {
		let mut map = BiMap::new();
		map.insert("a".to_owned(), "x".to_owned())?;
		map.insert("b".to_owned(), "y".to_owned())?;

		assert_eq!(map.get("a"), Some(&"x".to_owned()));
		assert_eq!(map.get_back("y"), Some(&"b".to_owned()));
		assert_eq!(map.get("x"), None);
		assert_eq!(map.len(), 2);
		Ok(())
	}

	#[test]
	fn rejects_duplicate_keys() -> Result<()> {
		let mut map = BiMap::new();
		map.insert("a".to_owned(), "x".to_owned())?;

		let err = map.insert("a".to_owned(), "y".to_owned()).unwrap_err();
		assert_eq!(err.to_string(), "duplicate key \"a\": already mapped to \"x\"");
		Ok(())
	}

	#[test]
	fn rejects_duplicate_values() -> Result<()> {
		let mut map = BiMap::new();
		map.insert("a".to_owned(), "x".to_owned())?;

		let err = map.insert("b".to_owned(), "x".to_owned()).unwrap_err();
		assert_eq!(err.to_string(), "duplicate value \"x\": already mapped from \"a\"");
		Ok(())
	}
}

use std::io::Read;
use anyhow::{anyhow, bail, Context, Result};
use indexmap::IndexMap;
use crate::MyRead;
use crate::name::{ClassName, FieldDescriptor, FieldName, MethodDescriptor, MethodName};

#[derive(Debug)]
pub(crate) struct Pool(IndexMap<usize, Option<PoolEntry>>);

impl Pool {
	pub(crate) fn parse(reader: &mut impl MyRead) -> Result<Pool> {
		let count = reader.read_u16_as_usize()?;
		let mut map = IndexMap::new();

		map.insert(0, None); // constant pool indexing starts at 1

		let mut index = 1;
		while index < count {
			let (entry, slots) = PoolEntry::parse(reader)
				.with_context(|| format!("failed to parse constant pool entry {index}"))?;

			map.insert(index, entry);
			index += slots;
		}

		Ok(Pool(map))
	}

	fn entry(&self, index: usize) -> Result<&Option<PoolEntry>> {
		self.0.get(&index)
			.ok_or_else(|| anyhow!("constant pool index {index} out of bounds for pool of size {}", self.0.len()))
	}

	fn get_utf8(&self, index: usize) -> Result<String> {
		let entry = self.entry(index)?;
		let Some(PoolEntry::Utf8(vec)) = entry else {
			bail!("entry isn't utf8, we got: {entry:?}");
		};
		let string = String::from_utf8(vec.clone())?;
		Ok(string)
	}

	pub(crate) fn get_class_name(&self, index: usize) -> Result<ClassName> {
		let entry = self.entry(index)?;
		let Some(PoolEntry::Class(utf8_index)) = entry else {
			bail!("entry isn't a class, we got: {entry:?}");
		};
		self.get_utf8(*utf8_index)
			.context("we can only work with utf8 class names")?
			.try_into()
	}

	pub(crate) fn get_super_class(&self, index: usize) -> Result<Option<ClassName>> {
		if index == 0 {
			// only `java/lang/Object` has no super class
			return Ok(None);
		}
		self.get_class_name(index).map(Some)
	}

	pub(crate) fn get_field_name(&self, index: usize) -> Result<FieldName> {
		self.get_utf8(index).context("we can only work with utf8 field names").map(FieldName::from)
	}

	pub(crate) fn get_field_descriptor(&self, index: usize) -> Result<FieldDescriptor> {
		self.get_utf8(index).context("we can only work with utf8 field descriptors").map(FieldDescriptor::from)
	}

	pub(crate) fn get_method_name(&self, index: usize) -> Result<MethodName> {
		self.get_utf8(index).context("we can only work with utf8 method names").map(MethodName::from)
	}

	pub(crate) fn get_method_descriptor(&self, index: usize) -> Result<MethodDescriptor> {
		self.get_utf8(index).context("we can only work with utf8 method descriptors").map(MethodDescriptor::from)
	}
}

#[derive(Debug)]
pub(crate) enum PoolEntry {
	Utf8(Vec<u8>),
	Class(usize),
}

impl PoolEntry {
	/// Parses one entry, returning it (or `None` for the kinds this crate has
	/// no use for) together with the number of pool slots it occupies.
	fn parse(reader: &mut impl Read) -> Result<(Option<PoolEntry>, usize)> {
		Ok(match reader.read_u8()? {
			1 => (Some(Self::Utf8(reader.read_vec(
				|r| r.read_u16_as_usize(),
				|r| r.read_u8()
			)?)), 1),
			3 | 4 | 9 | 10 | 11 | 12 | 17 | 18 => {
				reader.read_u32()?;
				(None, 1)
			},
			5 | 6 => {
				// longs and doubles take up two slots
				reader.read_u32()?;
				reader.read_u32()?;
				(None, 2)
			},
			7 => (Some(Self::Class(reader.read_u16_as_usize()?)), 1),
			8 | 16 | 19 | 20 => {
				reader.read_u16()?;
				(None, 1)
			},
			15 => {
				reader.read_u8()?;
				reader.read_u16()?;
				(None, 1)
			},
			tag => bail!("unknown constant pool tag {tag}"),
		})
	}
}

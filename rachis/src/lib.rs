//! Structural reading and patching of class files.
//!
//! [`ClassFile::parse`] reads just enough of a class file to expose the
//! access flags of the class itself and of every field and method, with
//! names and descriptors resolved from the constant pool. Everything else,
//! the pool included, is only skipped over, and the raw input is kept:
//! [`ClassFile::into_bytes`] writes the (possibly replaced) flag words back
//! into the original buffer, so every byte this crate doesn't interpret
//! comes out exactly as it went in.
//!
//! ```
//! # use pretty_assertions::assert_eq;
//! use rachis::ClassFile;
//!
//! let bytes = plumule::ClassFileBuilder::new("com/example/Foo")
//!     .field(plumule::flags::ACC_PRIVATE, "bar", "I")
//!     .build();
//!
//! let class = ClassFile::parse(bytes.clone())?;
//! assert_eq!(class.this_class.as_inner(), "com/example/Foo");
//! assert_eq!(class.fields.len(), 1);
//!
//! // nothing changed, so the bytes come back unchanged
//! assert_eq!(class.into_bytes(), bytes);
//! # Ok::<(), anyhow::Error>(())
//! ```

use std::fmt::{Debug, Formatter};
use std::io::{Cursor, Read};
use anyhow::{bail, Context, Result};
use crate::flags::AccessFlags;
use crate::name::{ClassName, FieldDescriptor, FieldName, MethodDescriptor, MethodName};
use crate::pool::Pool;

mod macros;
pub mod flags;
pub mod name;
mod pool;

pub(crate) trait MyRead: Read {
	fn read_n<const N: usize>(&mut self) -> Result<[u8; N]> {
		let mut buf = [0u8; N];
		self.read_exact(&mut buf)?;
		Ok(buf)
	}
	fn read_u8(&mut self) -> Result<u8> {
		Ok(u8::from_be_bytes(self.read_n().context("couldn't read u8, perhaps the data's end is reached?")?))
	}
	fn read_u16(&mut self) -> Result<u16> {
		Ok(u16::from_be_bytes(self.read_n().context("couldn't read u16, perhaps the data's end is reached?")?))
	}
	fn read_u32(&mut self) -> Result<u32> {
		Ok(u32::from_be_bytes(self.read_n().context("couldn't read u32, perhaps the data's end is reached?")?))
	}
	fn read_u16_as_usize(&mut self) -> Result<usize> {
		Ok(self.read_u16()? as usize)
	}
	fn read_vec<T, S, E>(&mut self, get_size: S, mut get_element: E) -> Result<Vec<T>>
	where
		S: FnOnce(&mut Self) -> Result<usize>,
		E: FnMut(&mut Self) -> Result<T>
	{
		let size = get_size(self)?;
		let mut vec = Vec::with_capacity(size);
		for _ in 0..size {
			vec.push(get_element(self)?);
		}
		Ok(vec)
	}
}
impl<T: Read> MyRead for T {}

fn skip_attribute(reader: &mut Cursor<&[u8]>) -> Result<()> {
	let _ = reader.read_u16()?; // attribute_name_index
	let attribute_length = reader.read_u32()? as u64;

	let end = reader.position() + attribute_length;
	if end > reader.get_ref().len() as u64 {
		bail!("attribute of length {attribute_length} runs past the end of the class file");
	}
	reader.set_position(end);
	Ok(())
}

/// A field of a parsed [`ClassFile`].
#[derive(Debug, Clone)]
pub struct FieldInfo {
	access_flags_offset: usize,
	pub access_flags: AccessFlags,
	pub name: FieldName,
	pub descriptor: FieldDescriptor,
}

impl FieldInfo {
	fn parse(reader: &mut Cursor<&[u8]>, pool: &Pool) -> Result<FieldInfo> {
		let access_flags_offset = reader.position() as usize;
		let access_flags = reader.read_u16()?.into();

		let name = pool.get_field_name(reader.read_u16_as_usize()?)
			.context("failed to get field name from constant pool")?;
		let descriptor = pool.get_field_descriptor(reader.read_u16_as_usize()?)
			.context("failed to get field descriptor from constant pool")?;

		let attributes_count = reader.read_u16_as_usize()?;
		for _ in 0..attributes_count {
			skip_attribute(reader).context("failed to skip a field attribute")?;
		}

		Ok(FieldInfo { access_flags_offset, access_flags, name, descriptor })
	}
}

/// A method of a parsed [`ClassFile`].
#[derive(Debug, Clone)]
pub struct MethodInfo {
	access_flags_offset: usize,
	pub access_flags: AccessFlags,
	pub name: MethodName,
	pub descriptor: MethodDescriptor,
}

impl MethodInfo {
	fn parse(reader: &mut Cursor<&[u8]>, pool: &Pool) -> Result<MethodInfo> {
		let access_flags_offset = reader.position() as usize;
		let access_flags = reader.read_u16()?.into();

		let name = pool.get_method_name(reader.read_u16_as_usize()?)
			.context("failed to get method name from constant pool")?;
		let descriptor = pool.get_method_descriptor(reader.read_u16_as_usize()?)
			.context("failed to get method descriptor from constant pool")?;

		let attributes_count = reader.read_u16_as_usize()?;
		for _ in 0..attributes_count {
			skip_attribute(reader).context("failed to skip a method attribute")?;
		}

		Ok(MethodInfo { access_flags_offset, access_flags, name, descriptor })
	}
}

/// A structurally parsed class file.
///
/// The `access_flags` fields on this and on [`FieldInfo`]/[`MethodInfo`] may
/// be freely replaced before calling [`ClassFile::into_bytes`].
pub struct ClassFile {
	buf: Vec<u8>,
	access_flags_offset: usize,
	pub minor_version: u16,
	pub major_version: u16,
	pub access_flags: AccessFlags,
	pub this_class: ClassName,
	pub super_class: Option<ClassName>,
	pub interfaces: Vec<ClassName>,
	pub fields: Vec<FieldInfo>,
	pub methods: Vec<MethodInfo>,
}

impl ClassFile {
	pub fn parse(bytes: Vec<u8>) -> Result<ClassFile> {
		let mut reader = Cursor::new(bytes.as_slice());

		let magic = reader.read_u32()?;
		if magic != 0xCAFE_BABE {
			bail!("magic didn't match up: {magic:#010x}");
		}

		let minor_version = reader.read_u16()?;
		let major_version = reader.read_u16()?;

		let pool = Pool::parse(&mut reader)
			.context("failed to parse constant pool")?;

		let access_flags_offset = reader.position() as usize;
		let access_flags = reader.read_u16()?.into();

		let this_class = pool.get_class_name(reader.read_u16_as_usize()?)
			.context("failed to get constant pool item `this_class`")?;
		let super_class = pool.get_super_class(reader.read_u16_as_usize()?)
			.context("failed to get constant pool item `super_class`")?;

		let interfaces = reader.read_vec(
			|r| r.read_u16_as_usize(),
			|r| pool.get_class_name(r.read_u16_as_usize()?)
				.context("failed to get constant pool item representing a direct superinterface")
		)?;

		let fields = reader.read_vec(
			|r| r.read_u16_as_usize(),
			|r| FieldInfo::parse(r, &pool)
				.context("failed to parse a field")
		)?;

		let methods = reader.read_vec(
			|r| r.read_u16_as_usize(),
			|r| MethodInfo::parse(r, &pool)
				.context("failed to parse a method")
		)?;

		// class level attributes follow here; they are never interpreted
		// and stay in the buffer as they are

		Ok(ClassFile {
			buf: bytes,
			access_flags_offset,
			minor_version,
			major_version,
			access_flags,
			this_class,
			super_class,
			interfaces,
			fields,
			methods,
		})
	}

	/// Serializes by patching the current flag words back into the buffer
	/// the class was parsed from.
	pub fn into_bytes(self) -> Vec<u8> {
		let mut buf = self.buf;
		patch_access_flags(&mut buf, self.access_flags_offset, self.access_flags);
		for field in &self.fields {
			patch_access_flags(&mut buf, field.access_flags_offset, field.access_flags);
		}
		for method in &self.methods {
			patch_access_flags(&mut buf, method.access_flags_offset, method.access_flags);
		}
		buf
	}
}

fn patch_access_flags(buf: &mut [u8], offset: usize, flags: AccessFlags) {
	// the offset was recorded while parsing this same buffer, so it's in bounds
	buf[offset..offset + 2].copy_from_slice(&u16::from(flags).to_be_bytes());
}

/// [`Debug`] prints everything except the raw bytes.
impl Debug for ClassFile {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ClassFile")
			.field("size", &self.buf.len())
			.field("minor_version", &self.minor_version)
			.field("major_version", &self.major_version)
			.field("access_flags", &self.access_flags)
			.field("this_class", &self.this_class)
			.field("super_class", &self.super_class)
			.field("interfaces", &self.interfaces)
			.field("fields", &self.fields)
			.field("methods", &self.methods)
			.finish_non_exhaustive()
	}
}

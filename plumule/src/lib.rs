//! Assembles small class files for tests.
//!
//! [`ClassFileBuilder`] produces the binary representation described in the
//! [Java Virtual Machine Specification, Chapter 4](https://docs.oracle.com/javase/specs/jvms/se21/html/jvms-4.html),
//! taking care of the constant pool bookkeeping itself. Only the structures
//! this workspace reads back can be built; bytecode cannot.
//!
//! ```
//! # use pretty_assertions::assert_eq;
//! use plumule::{ClassFileBuilder, flags};
//!
//! let bytes = ClassFileBuilder::new("org/example/Main")
//!     .access(flags::ACC_PUBLIC | flags::ACC_SUPER)
//!     .field(flags::ACC_PRIVATE | flags::ACC_STATIC, "count", "I")
//!     .method(flags::ACC_PUBLIC, "run", "()V")
//!     .build();
//!
//! assert_eq!(bytes[..4], [0xCA, 0xFE, 0xBA, 0xBE]);
//! ```

pub mod flags {
	pub const ACC_PUBLIC: u16    = 0x0001; // class, field, method
	pub const ACC_PRIVATE: u16   = 0x0002; // field, method
	pub const ACC_PROTECTED: u16 = 0x0004; // field, method
	pub const ACC_STATIC: u16    = 0x0008; // field, method
	pub const ACC_FINAL: u16     = 0x0010; // class, field, method
	pub const ACC_SUPER: u16     = 0x0020; // class
	pub const ACC_INTERFACE: u16 = 0x0200; // class
	pub const ACC_ABSTRACT: u16  = 0x0400; // class, method
	pub const ACC_SYNTHETIC: u16 = 0x1000; // class, field, method
	pub const ACC_ENUM: u16      = 0x4000; // class, field
}

#[derive(Debug)]
enum Constant {
	Long(i64),
	Double(f64),
}

#[derive(Debug)]
struct Member {
	access_flags: u16,
	name: String,
	descriptor: String,
	attributes: Vec<(String, Vec<u8>)>,
}

/// Builds the bytes of one class file.
///
/// [`ClassFileBuilder::new`] starts a version `52.0` class extending
/// `java/lang/Object`, with just the `ACC_SUPER` flag set; each setter
/// replaces the corresponding default.
#[derive(Debug)]
pub struct ClassFileBuilder {
	minor_version: u16,
	major_version: u16,
	access_flags: u16,
	this_class: String,
	super_class: Option<String>,
	interfaces: Vec<String>,
	fields: Vec<Member>,
	methods: Vec<Member>,
	constants: Vec<Constant>,
	attributes: Vec<(String, Vec<u8>)>,
}

impl ClassFileBuilder {
	pub fn new(this_class: &str) -> ClassFileBuilder {
		ClassFileBuilder {
			minor_version: 0,
			major_version: 52,
			access_flags: flags::ACC_SUPER,
			this_class: this_class.to_owned(),
			super_class: Some("java/lang/Object".to_owned()),
			interfaces: Vec::new(),
			fields: Vec::new(),
			methods: Vec::new(),
			constants: Vec::new(),
			attributes: Vec::new(),
		}
	}

	pub fn version(mut self, major: u16, minor: u16) -> ClassFileBuilder {
		self.major_version = major;
		self.minor_version = minor;
		self
	}

	pub fn access(mut self, access_flags: u16) -> ClassFileBuilder {
		self.access_flags = access_flags;
		self
	}

	pub fn super_class(mut self, super_class: &str) -> ClassFileBuilder {
		self.super_class = Some(super_class.to_owned());
		self
	}

	/// Writes `0` into the `super_class` slot, like for `java/lang/Object`.
	pub fn no_super_class(mut self) -> ClassFileBuilder {
		self.super_class = None;
		self
	}

	pub fn interface(mut self, interface: &str) -> ClassFileBuilder {
		self.interfaces.push(interface.to_owned());
		self
	}

	pub fn field(mut self, access_flags: u16, name: &str, descriptor: &str) -> ClassFileBuilder {
		self.fields.push(Member {
			access_flags,
			name: name.to_owned(),
			descriptor: descriptor.to_owned(),
			attributes: Vec::new(),
		});
		self
	}

	pub fn method(mut self, access_flags: u16, name: &str, descriptor: &str) -> ClassFileBuilder {
		self.methods.push(Member {
			access_flags,
			name: name.to_owned(),
			descriptor: descriptor.to_owned(),
			attributes: Vec::new(),
		});
		self
	}

	/// Attaches an attribute to the most recently added field.
	///
	/// # Panics
	/// Panics if no field has been added yet.
	pub fn field_attribute(mut self, name: &str, payload: &[u8]) -> ClassFileBuilder {
		match self.fields.last_mut() {
			Some(field) => field.attributes.push((name.to_owned(), payload.to_vec())),
			None => panic!("no field to attach attribute {name:?} to"),
		}
		self
	}

	/// Attaches an attribute to the most recently added method.
	///
	/// # Panics
	/// Panics if no method has been added yet.
	pub fn method_attribute(mut self, name: &str, payload: &[u8]) -> ClassFileBuilder {
		match self.methods.last_mut() {
			Some(method) => method.attributes.push((name.to_owned(), payload.to_vec())),
			None => panic!("no method to attach attribute {name:?} to"),
		}
		self
	}

	/// Adds a `CONSTANT_Long_info`, which takes up two constant pool slots.
	pub fn long_constant(mut self, value: i64) -> ClassFileBuilder {
		self.constants.push(Constant::Long(value));
		self
	}

	/// Adds a `CONSTANT_Double_info`, which takes up two constant pool slots.
	pub fn double_constant(mut self, value: f64) -> ClassFileBuilder {
		self.constants.push(Constant::Double(value));
		self
	}

	pub fn class_attribute(mut self, name: &str, payload: &[u8]) -> ClassFileBuilder {
		self.attributes.push((name.to_owned(), payload.to_vec()));
		self
	}

	pub fn build(self) -> Vec<u8> {
		let mut pool = Pool { bytes: Vec::new(), next_index: 1 };

		let this_class = pool.add_class(&self.this_class);
		let super_class = match &self.super_class {
			Some(name) => pool.add_class(name),
			None => 0,
		};
		let interfaces: Vec<u16> = self.interfaces.iter()
			.map(|name| pool.add_class(name))
			.collect();

		let fields: Vec<Vec<u8>> = self.fields.iter()
			.map(|member| member.serialize(&mut pool))
			.collect();
		let methods: Vec<Vec<u8>> = self.methods.iter()
			.map(|member| member.serialize(&mut pool))
			.collect();

		for constant in &self.constants {
			match constant {
				Constant::Long(value) => { pool.add_long(*value); },
				Constant::Double(value) => { pool.add_double(*value); },
			}
		}

		let attributes: Vec<Vec<u8>> = self.attributes.iter()
			.map(|(name, payload)| serialize_attribute(&mut pool, name, payload))
			.collect();

		let mut vec = Vec::new();
		vec.extend_from_slice(&[0xCA, 0xFE, 0xBA, 0xBE]);
		push_u16(&mut vec, self.minor_version);
		push_u16(&mut vec, self.major_version);
		// the constant pool count is the highest used index plus one
		push_u16(&mut vec, pool.next_index);
		vec.extend_from_slice(&pool.bytes);
		push_u16(&mut vec, self.access_flags);
		push_u16(&mut vec, this_class);
		push_u16(&mut vec, super_class);
		push_u16(&mut vec, self.interfaces.len() as u16);
		for interface in interfaces {
			push_u16(&mut vec, interface);
		}
		push_u16(&mut vec, self.fields.len() as u16);
		for field in fields {
			vec.extend_from_slice(&field);
		}
		push_u16(&mut vec, self.methods.len() as u16);
		for method in methods {
			vec.extend_from_slice(&method);
		}
		push_u16(&mut vec, self.attributes.len() as u16);
		for attribute in attributes {
			vec.extend_from_slice(&attribute);
		}
		vec
	}
}

impl Member {
	fn serialize(&self, pool: &mut Pool) -> Vec<u8> {
		let name = pool.add_utf8(&self.name);
		let descriptor = pool.add_utf8(&self.descriptor);

		let mut vec = Vec::new();
		push_u16(&mut vec, self.access_flags);
		push_u16(&mut vec, name);
		push_u16(&mut vec, descriptor);
		push_u16(&mut vec, self.attributes.len() as u16);
		for (name, payload) in &self.attributes {
			vec.extend_from_slice(&serialize_attribute(pool, name, payload));
		}
		vec
	}
}

/// Serialized constant pool items, appended as their indices are handed out.
struct Pool {
	bytes: Vec<u8>,
	next_index: u16,
}

impl Pool {
	fn add_utf8(&mut self, string: &str) -> u16 {
		let index = self.take_slots(1);
		self.bytes.push(1); // CONSTANT_Utf8
		// strings used here are plain ASCII, which modified UTF-8 agrees with
		push_u16(&mut self.bytes, string.len() as u16);
		self.bytes.extend_from_slice(string.as_bytes());
		index
	}

	fn add_class(&mut self, name: &str) -> u16 {
		let name_index = self.add_utf8(name);
		let index = self.take_slots(1);
		self.bytes.push(7); // CONSTANT_Class
		push_u16(&mut self.bytes, name_index);
		index
	}

	fn add_long(&mut self, value: i64) -> u16 {
		let index = self.take_slots(2);
		self.bytes.push(5); // CONSTANT_Long
		self.bytes.extend_from_slice(&value.to_be_bytes());
		index
	}

	fn add_double(&mut self, value: f64) -> u16 {
		let index = self.take_slots(2);
		self.bytes.push(6); // CONSTANT_Double
		self.bytes.extend_from_slice(&value.to_be_bytes());
		index
	}

	fn take_slots(&mut self, slots: u16) -> u16 {
		let index = self.next_index;
		self.next_index += slots;
		index
	}
}

fn serialize_attribute(pool: &mut Pool, name: &str, payload: &[u8]) -> Vec<u8> {
	let name_index = pool.add_utf8(name);

	let mut vec = Vec::new();
	push_u16(&mut vec, name_index);
	push_u32(&mut vec, payload.len() as u32);
	vec.extend_from_slice(payload);
	vec
}

fn push_u16(vec: &mut Vec<u8>, value: u16) {
	vec.extend_from_slice(&value.to_be_bytes());
}

fn push_u32(vec: &mut Vec<u8>, value: u32) {
	vec.extend_from_slice(&value.to_be_bytes());
}

#[cfg(test)]
mod testing {
	use pretty_assertions::assert_eq;
	use crate::ClassFileBuilder;

	#[test]
	fn empty_class_bytes() {
		let bytes = ClassFileBuilder::new("A")
			.no_super_class()
			.build();

		assert_eq!(bytes, vec![
			0xCA, 0xFE, 0xBA, 0xBE, // magic
			0x00, 0x00, // minor_version
			0x00, 0x34, // major_version
			0x00, 0x03, // constant_pool_count
			0x01, 0x00, 0x01, b'A', // 1: Utf8 "A"
			0x07, 0x00, 0x01, // 2: Class "A"
			0x00, 0x20, // access_flags: ACC_SUPER
			0x00, 0x02, // this_class
			0x00, 0x00, // super_class
			0x00, 0x00, // interfaces_count
			0x00, 0x00, // fields_count
			0x00, 0x00, // methods_count
			0x00, 0x00, // attributes_count
		]);
	}

	#[test]
	fn long_takes_two_slots() {
		let bytes = ClassFileBuilder::new("A")
			.long_constant(5)
			.build();

		// "A" and "java/lang/Object" with their class items use indices
		// 1 to 4, the long sits at 5 and 6
		assert_eq!(bytes[8..10], [0x00, 0x07]);
	}
}

//! Access flag words and the bits this crate interprets.

use std::fmt::{Debug, Formatter};

pub const ACC_PUBLIC: u16    = 0x0001; // class, field, method
pub const ACC_PRIVATE: u16   = 0x0002; // field, method
pub const ACC_PROTECTED: u16 = 0x0004; // field, method
pub const ACC_STATIC: u16    = 0x0008; // field, method
pub const ACC_FINAL: u16     = 0x0010; // class, field, method

/// The bits holding the visibility of a class, field or method.
///
/// At most one of them may be set; all of them clear means package-private.
pub const VISIBILITY_MASK: u16 = ACC_PUBLIC | ACC_PRIVATE | ACC_PROTECTED;

/// An access flags word of a class, field or method.
///
/// This is deliberately not an enum of known bits: whatever the class file
/// declares is kept as is, so that bits this crate doesn't interpret survive
/// a parse and re-serialize round trip unchanged.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct AccessFlags(u16);

impl AccessFlags {
	pub fn is_final(self) -> bool {
		self.0 & ACC_FINAL != 0
	}
}

impl From<u16> for AccessFlags {
	fn from(value: u16) -> AccessFlags {
		AccessFlags(value)
	}
}

impl From<AccessFlags> for u16 {
	fn from(value: AccessFlags) -> u16 {
		value.0
	}
}

impl Debug for AccessFlags {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "AccessFlags({:#06x})", self.0)
	}
}

#[cfg(test)]
mod testing {
	use pretty_assertions::assert_eq;
	use super::*;

	#[test]
	fn round_trip() {
		for bits in [0x0000, 0x0001, 0x0012, 0x1234, 0xffff] {
			let flags = AccessFlags::from(bits);
			assert_eq!(u16::from(flags), bits);
		}
	}

	#[test]
	fn final_bit() {
		assert!(AccessFlags::from(ACC_FINAL).is_final());
		assert!(AccessFlags::from(ACC_PUBLIC | ACC_FINAL).is_final());
		assert!(!AccessFlags::from(ACC_PUBLIC).is_final());
	}

	#[test]
	fn debug_is_hex() {
		assert_eq!(format!("{:?}", AccessFlags::from(0x0012)), "AccessFlags(0x0012)");
	}
}

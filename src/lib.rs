//! Class file patching for remapping and deobfuscation pipelines.
//!
//! There are two halves, usable independently. The [`inherit`] module answers
//! "what are the direct supertypes of class X", with
//! [`inherit::RemappingInheritanceProvider`] translating such queries across
//! the renaming boundary described by a [`mapping::NameMapping`]. The
//! [`access`] module rewrites the visibility of classes, fields and methods
//! inside compiled classes, widening-only, following rules loaded from access
//! transformer files.
//!
//! Name mappings in the `.srg` format are read by the [`srg`] module.

pub mod access;
pub mod inherit;
pub mod mapper;
pub mod mapping;
pub mod srg;

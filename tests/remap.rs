//! Inheritance lookups against jars, decorated with a name mapping.

use std::io::{Cursor, Write};
use anyhow::Result;
use pretty_assertions::assert_eq;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;
use nestbox::Jar;
use plumule::{flags, ClassFileBuilder};
use rachis::name::{ClassName, ClassNameSlice};
use preen::inherit::{InheritanceProvider, JarInheritanceProvider, NoInheritanceProvider, RemappingInheritanceProvider};
use preen::mapping::NameMapping;
use preen::srg;

fn name(s: &str) -> &ClassNameSlice {
	s.try_into().unwrap()
}

fn parents(names: &[&str]) -> Vec<ClassName> {
	names.iter().map(|name| ClassName::try_from(*name).unwrap()).collect()
}

fn jar_with(classes: &[(&str, Vec<u8>)]) -> Result<Jar<Cursor<Vec<u8>>>> {
	let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
	for (name, bytes) in classes {
		writer.start_file(format!("{name}.class"), SimpleFileOptions::default())?;
		writer.write_all(bytes)?;
	}
	Jar::new("test.jar", writer.finish()?)
}

/// A jar in the obfuscated namespace: `a/b extends a/c implements a/d`.
fn obfuscated_jar() -> Result<Jar<Cursor<Vec<u8>>>> {
	jar_with(&[
		("a/b", ClassFileBuilder::new("a/b")
			.super_class("a/c")
			.interface("a/d")
			.interface("java/io/Serializable")
			.build()),
		("a/c", ClassFileBuilder::new("a/c").build()),
		("a/d", ClassFileBuilder::new("a/d")
			.access(flags::ACC_INTERFACE | flags::ACC_ABSTRACT)
			.build()),
	])
}

/// Maps the named namespace onto the obfuscated one of [`obfuscated_jar`].
fn named_to_obfuscated() -> Result<NameMapping> {
	srg::read("\
PK: org/example a
CL: org/example/Widget a/b
CL: org/example/Base a/c
".as_bytes())
}

#[test]
fn jar_provider_lists_super_class_then_interfaces() -> Result<()> {
	let mut jar = obfuscated_jar()?;
	let provider = JarInheritanceProvider::from_jar(&mut jar)?;

	assert_eq!(provider.get_parents(name("a/b"))?, Some(parents(&["a/c", "a/d", "java/io/Serializable"])));
	assert_eq!(provider.get_parents(name("a/d"))?, Some(parents(&["java/lang/Object"])));
	assert_eq!(provider.get_parents(name("x/y"))?, None);
	Ok(())
}

#[test]
fn known_class_without_parents_is_not_unknown() -> Result<()> {
	let mut jar = jar_with(&[
		("java/lang/Object", ClassFileBuilder::new("java/lang/Object").no_super_class().build()),
	])?;
	let provider = JarInheritanceProvider::from_jar(&mut jar)?;

	assert_eq!(provider.get_parents(name("java/lang/Object"))?, Some(Vec::new()));
	assert_eq!(provider.get_parents(name("a/b"))?, None);
	Ok(())
}

#[test]
fn no_inheritance_provider_knows_nothing() -> Result<()> {
	let provider = NoInheritanceProvider::new();

	assert_eq!(provider.get_parents(name("java/lang/Object"))?, None);
	Ok(())
}

#[test]
fn first_provider_with_an_answer_wins() -> Result<()> {
	let mut first = jar_with(&[
		("a/b", ClassFileBuilder::new("a/b").super_class("a/c").build()),
	])?;
	let mut second = jar_with(&[
		("a/b", ClassFileBuilder::new("a/b").super_class("a/x").build()),
		("a/y", ClassFileBuilder::new("a/y").build()),
	])?;

	let providers: Vec<Box<dyn InheritanceProvider>> = vec![
		Box::new(NoInheritanceProvider),
		Box::new(JarInheritanceProvider::from_jar(&mut first)?),
		Box::new(JarInheritanceProvider::from_jar(&mut second)?),
	];

	// both jars know a/b, the answer comes from the first
	assert_eq!(providers.get_parents(name("a/b"))?, Some(parents(&["a/c"])));
	// a/y only exists in the second jar
	assert_eq!(providers.get_parents(name("a/y"))?, Some(parents(&["java/lang/Object"])));
	assert_eq!(providers.get_parents(name("a/z"))?, None);
	Ok(())
}

#[test]
fn decorator_translates_queries_and_answers() -> Result<()> {
	let mut jar = obfuscated_jar()?;
	let inner = JarInheritanceProvider::from_jar(&mut jar)?;
	let mapping = named_to_obfuscated()?;
	let provider = RemappingInheritanceProvider::new(&inner, &mapping);

	// a/d has no class entry, its package prefix maps back to org/example;
	// java/io/Serializable is outside the mapping and passes through
	assert_eq!(
		provider.get_parents(name("org/example/Widget"))?,
		Some(parents(&["org/example/Base", "org/example/d", "java/io/Serializable"])),
	);
	assert_eq!(
		provider.get_parents(name("org/example/Base"))?,
		Some(parents(&["java/lang/Object"])),
	);
	Ok(())
}

#[test]
fn decorator_keeps_unknown_classes_unknown() -> Result<()> {
	let mut jar = obfuscated_jar()?;
	let inner = JarInheritanceProvider::from_jar(&mut jar)?;
	let mapping = named_to_obfuscated()?;
	let provider = RemappingInheritanceProvider::new(&inner, &mapping);

	// org/example/Missing maps into a/Missing, which the jar doesn't have
	assert_eq!(provider.get_parents(name("org/example/Missing"))?, None);
	// names outside the mapping go through unchanged, and stay unknown too
	assert_eq!(provider.get_parents(name("some/Other"))?, None);
	Ok(())
}

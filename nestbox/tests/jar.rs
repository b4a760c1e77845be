use std::io::{Cursor, Write};
use anyhow::Result;
use pretty_assertions::assert_eq;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;
use plumule::ClassFileBuilder;
use plumule::flags::{ACC_PUBLIC, ACC_SUPER};
use nestbox::Jar;
use rachis::name::{ClassName, ClassNameSlice};

fn name(s: &str) -> &ClassNameSlice {
	s.try_into().unwrap()
}

fn sample_jar() -> Result<Vec<u8>> {
	let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
	let options = SimpleFileOptions::default();

	writer.start_file("META-INF/MANIFEST.MF", options)?;
	writer.write_all(b"Manifest-Version: 1.0\r\nMain-Class: org.example.Main\r\n\r\n")?;

	writer.start_file("org/example/Main.class", options)?;
	writer.write_all(&main_class_bytes())?;

	writer.start_file("org/example/Base.class", options)?;
	writer.write_all(&ClassFileBuilder::new("org/example/Base").build())?;

	writer.start_file("org/example/notes.txt", options)?;
	writer.write_all(b"not a class")?;

	Ok(writer.finish()?.into_inner())
}

fn main_class_bytes() -> Vec<u8> {
	ClassFileBuilder::new("org/example/Main")
		.access(ACC_PUBLIC | ACC_SUPER)
		.super_class("org/example/Base")
		.method(ACC_PUBLIC, "main", "([Ljava/lang/String;)V")
		.build()
}

#[test]
fn lists_classes_in_entry_order() -> Result<()> {
	let jar = Jar::new("sample.jar", Cursor::new(sample_jar()?))?;

	let names: Vec<&ClassNameSlice> = jar.class_names().collect();
	assert_eq!(names, vec![
		name("org/example/Main"),
		name("org/example/Base"),
	]);

	assert!(jar.has_class(name("org/example/Main")));
	assert!(!jar.has_class(name("org/example/Missing")));
	Ok(())
}

#[test]
fn reads_class_bytes() -> Result<()> {
	let mut jar = Jar::new("sample.jar", Cursor::new(sample_jar()?))?;

	assert_eq!(jar.class_bytes(name("org/example/Main"))?, Some(main_class_bytes()));
	assert_eq!(jar.class_bytes(name("org/example/Missing"))?, None);
	// there's an org/example/notes.txt entry, but that's not a class
	assert_eq!(jar.class_bytes(name("org/example/notes"))?, None);
	Ok(())
}

#[test]
fn parses_structures() -> Result<()> {
	let mut jar = Jar::new("sample.jar", Cursor::new(sample_jar()?))?;

	let main = jar.structure(name("org/example/Main"))?.unwrap();
	assert_eq!(main.this_class, ClassName::try_from("org/example/Main")?);
	assert_eq!(main.super_class, Some(ClassName::try_from("org/example/Base")?));
	assert_eq!(main.methods.len(), 1);

	// a second call answers from the cache
	let main = jar.structure(name("org/example/Main"))?.unwrap();
	assert_eq!(main.this_class, ClassName::try_from("org/example/Main")?);

	assert!(jar.structure(name("org/example/Missing"))?.is_none());
	Ok(())
}

#[test]
fn reads_main_class_from_manifest() -> Result<()> {
	let mut jar = Jar::new("sample.jar", Cursor::new(sample_jar()?))?;

	assert_eq!(jar.main_class()?, Some(ClassName::try_from("org/example/Main")?));
	Ok(())
}

#[test]
fn jar_without_manifest_has_no_main_class() -> Result<()> {
	let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
	writer.start_file("org/example/Base.class", SimpleFileOptions::default())?;
	writer.write_all(&ClassFileBuilder::new("org/example/Base").build())?;
	let data = writer.finish()?.into_inner();

	let mut jar = Jar::new("no manifest", Cursor::new(data))?;

	assert_eq!(jar.main_class()?, None);
	Ok(())
}

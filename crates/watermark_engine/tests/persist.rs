use std::fs;
use std::path::Path;

use tempfile::TempDir;
use watermark_engine::{ensure_output_dir, AtomicFileWriter};

#[test]
fn creates_missing_output_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("out");
    assert!(!new_dir.exists());
    ensure_output_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn atomic_write_replaces_existing() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());

    let first = writer.write(Path::new("a_wm.wav"), b"first").unwrap();
    assert_eq!(first.file_name().unwrap(), "a_wm.wav");
    assert_eq!(fs::read(&first).unwrap(), b"first");

    let second = writer.write(Path::new("a_wm.wav"), b"second").unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read(&second).unwrap(), b"second");
}

#[test]
fn nested_names_create_subdirectories() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());

    let saved = writer
        .write(Path::new("album/disc2/b_wm.wav"), b"data")
        .unwrap();

    assert_eq!(saved, temp.path().join("album/disc2/b_wm.wav"));
    assert_eq!(fs::read(saved).unwrap(), b"data");
}

#[test]
fn no_partial_file_on_error() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let writer = AtomicFileWriter::new(file_path.clone());
    let result = writer.write(Path::new("a_wm.wav"), b"data");
    assert!(result.is_err());
    assert!(!file_path.with_file_name("a_wm.wav").exists());
}

//! Upload validation against files on disk.

use std::fs;
use std::io::Cursor;

use image::{DynamicImage, ImageFormat, RgbaImage};
use topup_toolkit::{Dimensions, ImageUploadField, ValidationError};

fn write_png(path: &std::path::Path, width: u32, height: u32) {
    let mut bytes = Vec::new();
    DynamicImage::ImageRgba8(RgbaImage::new(width, height))
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    fs::write(path, bytes).unwrap();
}

#[test]
fn test_missing_file_is_valid() {
    let dir = tempfile::tempdir().unwrap();
    let field = ImageUploadField::new().max_size(1).valid_dimensions(10, 10);

    assert!(field.clean_path(dir.path().join("gone.png")).is_ok());
}

#[test]
fn test_banner_with_exact_dimensions_passes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("banner.png");
    write_png(&path, 120, 60);

    let field = ImageUploadField::new()
        .max_size(1024 * 1024)
        .valid_dimensions(60, 120);

    assert!(field.clean_path(&path).is_ok());
}

#[test]
fn test_wrong_dimensions_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("icon.png");
    write_png(&path, 64, 32);

    let err = ImageUploadField::new()
        .valid_dimensions(64, 64)
        .clean_path(&path)
        .unwrap_err();

    match err {
        ValidationError::WrongDimensions { expected, actual } => {
            assert_eq!(expected, Dimensions::new(64, 64));
            assert_eq!(actual, Dimensions::new(32, 64));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_oversized_file_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("big.bin");
    fs::write(&path, vec![0u8; 2048]).unwrap();

    let err = ImageUploadField::new()
        .max_size(1024)
        .clean_path(&path)
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "Please keep file size under 1024. Current file size is 2048"
    );
}

#[test]
fn test_text_file_is_not_an_image() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    fs::write(&path, "hello").unwrap();

    let err = ImageUploadField::new()
        .valid_dimensions(1, 1)
        .clean_path(&path)
        .unwrap_err();

    assert!(matches!(err, ValidationError::NotAnImage));
}

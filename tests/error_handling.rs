//! Error handling integration tests.
//!
//! These tests verify that meaningful errors are returned for various
//! failure conditions.

mod common;

use flipbook::{
    AcceptedContainer, FlipbookError, FrameRecord, SheetOptions, ValidationOptions, composite,
    decode,
};

#[test]
fn open_nonexistent_file() {
    let result = AcceptedContainer::open("this_file_does_not_exist.gif");
    assert!(result.is_err());

    let error_message = result.unwrap_err().to_string();
    assert!(
        error_message.contains("Failed to open GIF file"),
        "Error message should mention file open failure: {error_message}",
    );
}

#[test]
fn open_invalid_file() {
    let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");
    let invalid_file_path = temporary_directory.path().join("invalid.gif");
    std::fs::write(&invalid_file_path, b"this is not a gif file")
        .expect("Failed to write invalid file");

    let result = AcceptedContainer::open(&invalid_file_path);
    assert!(matches!(result, Err(FlipbookError::NotAGif)));
}

#[test]
fn open_empty_file() {
    let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");
    let empty_file_path = temporary_directory.path().join("empty.gif");
    std::fs::write(&empty_file_path, b"").expect("Failed to write empty file");

    let result = AcceptedContainer::open(&empty_file_path);
    assert!(matches!(result, Err(FlipbookError::EmptyInput)));
}

#[test]
fn open_oversize_file_is_rejected_before_reading() {
    let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");
    let path = temporary_directory.path().join("large.gif");
    std::fs::write(&path, common::red_then_blue_square()).expect("Failed to write fixture");

    let options = ValidationOptions::new().with_max_input_bytes(10);
    let result = AcceptedContainer::open_with_options(&path, &options);
    assert!(matches!(
        result,
        Err(FlipbookError::InputTooLarge { limit: 10, .. })
    ));
}

#[test]
fn open_valid_file_records_source() {
    let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");
    let path = temporary_directory.path().join("square.gif");
    std::fs::write(&path, common::red_then_blue_square()).expect("Failed to write fixture");

    let container = AcceptedContainer::open(&path).expect("Failed to open fixture");
    assert_eq!(container.source(), Some(path.as_path()));
}

#[test]
fn decode_truncated_stream() {
    let bytes = common::red_then_blue_square();
    let result = decode(&bytes[..bytes.len() / 2]);

    assert!(
        matches!(result, Err(FlipbookError::DecodeError(_))),
        "Expected DecodeError for truncated stream",
    );
}

#[test]
fn invalid_canvas_message() {
    let error = composite(0, 0, &[]).unwrap_err();
    assert_eq!(
        error.to_string(),
        "Invalid canvas size 0x0: both dimensions must be positive"
    );
}

#[test]
fn patch_length_mismatch_message() {
    let frames = vec![FrameRecord::new(0, 0, 2, 1, vec![0; 4])];
    let error = composite(4, 4, &frames).unwrap_err();
    let message = error.to_string();

    assert!(message.contains("Frame 0"), "{message}");
    assert!(message.contains("expected 8"), "{message}");
}

#[test]
fn input_too_large_message() {
    let error = FlipbookError::InputTooLarge {
        size: 20,
        limit: 10,
    };
    assert_eq!(
        error.to_string(),
        "Input is too large: 20 bytes (limit is 10 bytes)"
    );
}

#[test]
fn sheet_layout_rejects_empty_grid() {
    let flipbook = AcceptedContainer::from_bytes(common::red_then_blue_square())
        .expect("Failed to accept fixture")
        .decode()
        .expect("Failed to decode")
        .composite()
        .expect("Failed to composite");

    let result = flipbook.sheets(&SheetOptions::new(0, 4));
    assert!(matches!(result, Err(FlipbookError::InvalidSheetLayout(_))));

    let result = flipbook.sheets(&SheetOptions::new(2, 2).with_cell_width(0));
    assert!(matches!(result, Err(FlipbookError::InvalidSheetLayout(_))));
}

#[test]
fn io_error_converts() {
    let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    let error: FlipbookError = io_error.into();
    assert!(error.to_string().starts_with("I/O error"));
}

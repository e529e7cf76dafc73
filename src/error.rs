//! Error types for the `flipbook` crate.
//!
//! This module defines [`FlipbookError`], the unified error type returned by
//! every fallible operation in the crate. Variants carry the context needed to
//! diagnose a failure (frame index, patch geometry, size limits) without extra
//! logging at the call site.

use std::{io::Error as IoError, path::PathBuf};

use gif::DecodingError;
use image::ImageError;
use thiserror::Error;

/// The unified error type for all `flipbook` operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FlipbookError {
    /// The input file could not be read.
    #[error("Failed to open GIF file at {path}: {reason}")]
    FileOpen {
        /// Path that was passed to [`crate::AcceptedContainer::open`].
        path: PathBuf,
        /// Underlying reason the read failed.
        reason: String,
    },

    /// The input buffer was empty.
    #[error("Input is empty")]
    EmptyInput,

    /// The input does not start with a GIF signature.
    #[error("Input is not a GIF file (expected a GIF87a or GIF89a signature)")]
    NotAGif,

    /// The input exceeds the configured size ceiling.
    #[error("Input is too large: {size} bytes (limit is {limit} bytes)")]
    InputTooLarge {
        /// Size of the rejected input in bytes.
        size: u64,
        /// Configured ceiling in bytes.
        limit: u64,
    },

    /// The GIF stream could not be decoded.
    #[error("Failed to decode GIF: {0}")]
    DecodeError(String),

    /// The logical screen has a zero dimension, so there is no canvas to
    /// composite onto.
    #[error("Invalid canvas size {width}x{height}: both dimensions must be positive")]
    InvalidCanvas {
        /// Logical screen width.
        width: u32,
        /// Logical screen height.
        height: u32,
    },

    /// A frame record's pixel buffer does not hold `width * height * 4` bytes.
    ///
    /// This indicates a bug in whatever produced the record; the whole
    /// operation is aborted rather than compositing corrupt data.
    #[error(
        "Frame {frame_index} has {actual} bytes of pixel data (expected {expected} for its dimensions)"
    )]
    PatchLengthMismatch {
        /// Index of the offending frame in the input sequence.
        frame_index: usize,
        /// `width * height * 4` for the record.
        expected: usize,
        /// Actual buffer length.
        actual: usize,
    },

    /// A frame patch extends beyond the logical screen and the geometry
    /// policy is [`GeometryPolicy::Reject`](crate::GeometryPolicy::Reject).
    #[error(
        "Frame {frame_index} patch {width}x{height} at ({left}, {top}) exceeds the {canvas_width}x{canvas_height} canvas"
    )]
    PatchOutOfBounds {
        /// Index of the offending frame in the input sequence.
        frame_index: usize,
        /// Patch left offset.
        left: u32,
        /// Patch top offset.
        top: u32,
        /// Patch width.
        width: u32,
        /// Patch height.
        height: u32,
        /// Logical screen width.
        canvas_width: u32,
        /// Logical screen height.
        canvas_height: u32,
    },

    /// Sheet layout options cannot produce a page.
    #[error("Invalid sheet layout: {0}")]
    InvalidSheetLayout(String),

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    IoError(#[from] IoError),

    /// An error from the `image` crate while scaling or saving frames.
    #[error("Image processing error: {0}")]
    ImageError(#[from] ImageError),

    /// The operation was cancelled via a [`CancellationToken`](crate::CancellationToken).
    #[error("Operation cancelled")]
    Cancelled,
}

impl From<DecodingError> for FlipbookError {
    fn from(error: DecodingError) -> Self {
        FlipbookError::DecodeError(error.to_string())
    }
}

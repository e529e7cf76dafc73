//! Input acceptance and container validation.
//!
//! Two layers live here. [`accept`] is the hard gate every input passes
//! before decoding: it rejects empty buffers, oversize inputs, and anything
//! without a GIF signature. [`ValidationReport`] is the human-facing
//! summary of a decoded container, listing informational notices, warnings,
//! and errors.
//!
//! # Example
//!
//! ```no_run
//! use flipbook::{ValidationOptions, validate_bytes};
//!
//! let bytes = std::fs::read("animation.gif").unwrap();
//! let report = validate_bytes(&bytes, &ValidationOptions::default());
//! if report.is_valid() {
//!     println!("Ready to print");
//! } else {
//!     print!("{report}");
//! }
//! ```

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::fs;
use std::path::Path;

use crate::configuration::ValidationOptions;
use crate::decode::decode;
use crate::error::FlipbookError;
use crate::metadata::{ContainerMetadata, GifVersion};

/// Frame counts above this get a warning: each frame becomes a printed cell.
pub const PRINTABLE_FRAME_WARNING: usize = 1000;

/// Summary of container validation.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    /// Informational notices (not problems).
    pub info: Vec<String>,
    /// Issues that do not prevent compositing but may surprise.
    pub warnings: Vec<String>,
    /// Fatal issues that prevent compositing.
    pub errors: Vec<String>,
}

impl ValidationReport {
    /// Returns `true` if no errors were found. Warnings do not count.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Total number of entries (info + warnings + errors).
    pub fn issue_count(&self) -> usize {
        self.info.len() + self.warnings.len() + self.errors.len()
    }
}

impl Display for ValidationReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        for item in &self.info {
            writeln!(f, "[INFO] {item}")?;
        }
        for item in &self.warnings {
            writeln!(f, "[WARN] {item}")?;
        }
        for item in &self.errors {
            writeln!(f, "[ERROR] {item}")?;
        }
        if self.issue_count() == 0 {
            writeln!(f, "No issues found.")?;
        }
        Ok(())
    }
}

/// Gate an input buffer before decoding.
///
/// Checks run cheapest first: emptiness, size ceiling, then signature.
///
/// # Errors
///
/// [`FlipbookError::EmptyInput`], [`FlipbookError::InputTooLarge`] or
/// [`FlipbookError::NotAGif`].
pub fn accept(bytes: &[u8], options: &ValidationOptions) -> Result<GifVersion, FlipbookError> {
    if bytes.is_empty() {
        return Err(FlipbookError::EmptyInput);
    }

    let size = bytes.len() as u64;
    if size > options.max_input_bytes {
        return Err(FlipbookError::InputTooLarge {
            size,
            limit: options.max_input_bytes,
        });
    }

    GifVersion::sniff(bytes).ok_or(FlipbookError::NotAGif)
}

/// Accept, decode and inspect `bytes`, collecting every finding into a
/// report instead of failing.
pub fn validate_bytes(bytes: &[u8], options: &ValidationOptions) -> ValidationReport {
    if let Err(error) = accept(bytes, options) {
        return ValidationReport {
            errors: vec![error.to_string()],
            ..ValidationReport::default()
        };
    }

    match decode(bytes) {
        Ok(decoded) => validate_metadata(decoded.metadata()),
        Err(error) => ValidationReport {
            errors: vec![error.to_string()],
            ..ValidationReport::default()
        },
    }
}

/// Like [`validate_bytes`], reading the input from `path`.
///
/// The size ceiling is checked against the file's metadata, so an oversize
/// file is reported without being read.
///
/// # Errors
///
/// Returns [`FlipbookError::FileOpen`] if the file cannot be inspected or read.
pub fn validate_file<P: AsRef<Path>>(
    path: P,
    options: &ValidationOptions,
) -> Result<ValidationReport, FlipbookError> {
    let path = path.as_ref();
    let file_open = |error: std::io::Error| FlipbookError::FileOpen {
        path: path.to_path_buf(),
        reason: error.to_string(),
    };

    let size = fs::metadata(path).map_err(file_open)?.len();
    if size > options.max_input_bytes {
        let error = FlipbookError::InputTooLarge {
            size,
            limit: options.max_input_bytes,
        };
        return Ok(ValidationReport {
            errors: vec![error.to_string()],
            ..ValidationReport::default()
        });
    }

    let bytes = fs::read(path).map_err(file_open)?;
    Ok(validate_bytes(&bytes, options))
}

/// Run validation checks on decoded metadata.
pub fn validate_metadata(metadata: &ContainerMetadata) -> ValidationReport {
    let mut report = ValidationReport::default();

    report.info.push(format!(
        "{}: {}×{} logical screen, {} frames, {} bytes",
        metadata.version, metadata.width, metadata.height, metadata.frame_count, metadata.byte_len,
    ));

    if !metadata.has_global_palette {
        report
            .info
            .push("No global colour table; frames use local palettes".to_string());
    }

    if metadata.width == 0 || metadata.height == 0 {
        report.errors.push(format!(
            "Invalid logical screen dimensions: {}×{}",
            metadata.width, metadata.height,
        ));
    }

    if metadata.frame_count == 0 {
        report
            .warnings
            .push("Container has no frames; the flipbook will be empty".to_string());
    } else if metadata.frame_count > PRINTABLE_FRAME_WARNING {
        report.warnings.push(format!(
            "{} frames is a lot to print; consider trimming the animation",
            metadata.frame_count,
        ));
    }

    if metadata.disposal_frames > 0 {
        report.warnings.push(format!(
            "{} frame(s) request background/previous disposal; frames are composited cumulatively and may differ from playback",
            metadata.disposal_frames,
        ));
    }

    if metadata.overflowing_frames > 0 {
        report.warnings.push(format!(
            "{} frame(s) extend past the logical screen",
            metadata.overflowing_frames,
        ));
    }

    report
}

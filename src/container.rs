//! Pipeline stage values for one input container.
//!
//! Each stage is a distinct type, so a container cannot be decoded before it
//! has been accepted or composited before it has been decoded:
//!
//! ```text
//! AcceptedContainer --decode()--> DecodedContainer --composite()--> Flipbook
//! ```
//!
//! # Example
//!
//! ```no_run
//! use flipbook::{AcceptedContainer, FlipbookError};
//!
//! let flipbook = AcceptedContainer::open("animation.gif")?
//!     .decode()?
//!     .composite()?;
//! flipbook.save_frames("frames")?;
//! # Ok::<(), FlipbookError>(())
//! ```

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::fs;
use std::path::{Path, PathBuf};

use crate::compositor::{Compositor, composite_with_options};
use crate::configuration::{CompositeOptions, ValidationOptions};
use crate::decode::{FrameReader, decode};
use crate::error::FlipbookError;
use crate::flipbook::Flipbook;
use crate::frame::{FrameRecord, LogicalScreen};
use crate::frame_iterator::FrameIterator;
use crate::metadata::{ContainerMetadata, GifVersion};
use crate::validation::{ValidationReport, accept, validate_metadata};

/// Raw container bytes that passed the acceptance gate.
#[derive(Clone)]
pub struct AcceptedContainer {
    bytes: Vec<u8>,
    version: GifVersion,
    source: Option<PathBuf>,
}

impl Debug for AcceptedContainer {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("AcceptedContainer")
            .field("version", &self.version)
            .field("byte_len", &self.bytes.len())
            .field("source", &self.source)
            .finish()
    }
}

impl AcceptedContainer {
    /// Read and accept a GIF file using the default limits.
    ///
    /// # Errors
    ///
    /// See [`open_with_options`](AcceptedContainer::open_with_options).
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, FlipbookError> {
        Self::open_with_options(path, &ValidationOptions::default())
    }

    /// Read and accept a GIF file.
    ///
    /// The size ceiling is checked against the file's metadata before the
    /// file is read.
    ///
    /// # Errors
    ///
    /// Returns [`FlipbookError::FileOpen`] if the file cannot be read, or
    /// any error from [`accept`](crate::accept).
    pub fn open_with_options<P: AsRef<Path>>(
        path: P,
        options: &ValidationOptions,
    ) -> Result<Self, FlipbookError> {
        let path = path.as_ref();
        log::debug!("Opening GIF file: {}", path.display());

        let file_open = |error: std::io::Error| FlipbookError::FileOpen {
            path: path.to_path_buf(),
            reason: error.to_string(),
        };

        let size = fs::metadata(path).map_err(file_open)?.len();
        if size > options.max_input_bytes {
            return Err(FlipbookError::InputTooLarge {
                size,
                limit: options.max_input_bytes,
            });
        }

        let bytes = fs::read(path).map_err(file_open)?;
        let mut container = Self::from_bytes_with_options(bytes, options)?;
        container.source = Some(path.to_path_buf());
        Ok(container)
    }

    /// Accept an in-memory buffer using the default limits.
    ///
    /// # Errors
    ///
    /// Any error from [`accept`](crate::accept).
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, FlipbookError> {
        Self::from_bytes_with_options(bytes, &ValidationOptions::default())
    }

    /// Accept an in-memory buffer.
    ///
    /// # Errors
    ///
    /// Any error from [`accept`](crate::accept).
    pub fn from_bytes_with_options(
        bytes: Vec<u8>,
        options: &ValidationOptions,
    ) -> Result<Self, FlipbookError> {
        let version = accept(&bytes, options)?;
        Ok(Self {
            bytes,
            version,
            source: None,
        })
    }

    pub fn version(&self) -> GifVersion {
        self.version
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Path the container was read from, if it came from a file.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Decode every frame record.
    ///
    /// # Errors
    ///
    /// Returns [`FlipbookError::DecodeError`] for a malformed stream.
    pub fn decode(&self) -> Result<DecodedContainer, FlipbookError> {
        decode(&self.bytes)
    }

    /// Stream frame records without decoding the whole animation up front.
    ///
    /// # Errors
    ///
    /// Returns [`FlipbookError::DecodeError`] if the header is malformed.
    pub fn frame_reader(&self) -> Result<FrameReader<'_>, FlipbookError> {
        FrameReader::new(&self.bytes)
    }

    /// Decode and composite lazily, one frame per iteration.
    ///
    /// # Errors
    ///
    /// Returns [`FlipbookError::DecodeError`] for a malformed header or
    /// [`FlipbookError::InvalidCanvas`] for a zero-sized logical screen.
    pub fn frame_iter(
        &self,
        options: &CompositeOptions,
    ) -> Result<FrameIterator<FrameReader<'_>>, FlipbookError> {
        let reader = self.frame_reader()?;
        let screen = reader.screen();
        let compositor = Compositor::with_options(screen.width, screen.height, options)?;
        Ok(FrameIterator::new(compositor, reader, options.clone()))
    }

    /// Decode and composite on a background thread, streaming frames back.
    ///
    /// Must be called from within a Tokio runtime. Errors, including a
    /// malformed header, arrive as the last stream item.
    #[cfg(feature = "async")]
    pub fn frame_stream(self, options: CompositeOptions) -> crate::stream::FrameStream {
        crate::stream::create_frame_stream(self, options, None)
    }

    /// Like [`frame_stream`](AcceptedContainer::frame_stream) with an
    /// explicit channel capacity (clamped to at least 1).
    #[cfg(feature = "async")]
    pub fn frame_stream_with_capacity(
        self,
        options: CompositeOptions,
        capacity: usize,
    ) -> crate::stream::FrameStream {
        crate::stream::create_frame_stream(self, options, Some(capacity))
    }
}

/// A fully decoded container: logical screen, frame records and metadata.
#[derive(Debug, Clone)]
pub struct DecodedContainer {
    frames: Vec<FrameRecord>,
    metadata: ContainerMetadata,
}

impl DecodedContainer {
    pub(crate) fn new(frames: Vec<FrameRecord>, metadata: ContainerMetadata) -> Self {
        Self { frames, metadata }
    }

    pub fn screen(&self) -> LogicalScreen {
        self.metadata.screen()
    }

    pub fn metadata(&self) -> &ContainerMetadata {
        &self.metadata
    }

    /// Frame records in container order.
    pub fn frames(&self) -> &[FrameRecord] {
        &self.frames
    }

    pub fn into_frames(self) -> Vec<FrameRecord> {
        self.frames
    }

    /// Summarise the container for a human reader.
    pub fn validate(&self) -> ValidationReport {
        validate_metadata(&self.metadata)
    }

    /// Composite every frame with default options.
    ///
    /// # Errors
    ///
    /// See [`composite_with_options`](crate::composite_with_options).
    pub fn composite(&self) -> Result<Flipbook, FlipbookError> {
        self.composite_with_options(&CompositeOptions::default())
    }

    /// Composite every frame.
    ///
    /// # Errors
    ///
    /// See [`composite_with_options`](crate::composite_with_options).
    pub fn composite_with_options(
        &self,
        options: &CompositeOptions,
    ) -> Result<Flipbook, FlipbookError> {
        let screen = self.screen();
        let frames = composite_with_options(screen.width, screen.height, &self.frames, options)?;
        Ok(Flipbook::new(screen, frames))
    }
}

//! Container metadata types.
//!
//! [`ContainerMetadata`] is gathered while a container is decoded and cached
//! on the [`DecodedContainer`](crate::DecodedContainer). It feeds the
//! [`ValidationReport`](crate::ValidationReport) and the CLI `info` command.

use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::frame::LogicalScreen;

/// GIF format revision, taken from the six-byte signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GifVersion {
    /// `GIF87a`.
    Gif87a,
    /// `GIF89a`.
    Gif89a,
}

impl GifVersion {
    /// Recognise the signature at the start of `bytes`.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        match bytes.get(..6)? {
            b"GIF87a" => Some(Self::Gif87a),
            b"GIF89a" => Some(Self::Gif89a),
            _ => None,
        }
    }
}

impl Display for GifVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            GifVersion::Gif87a => f.write_str("GIF87a"),
            GifVersion::Gif89a => f.write_str("GIF89a"),
        }
    }
}

/// Metadata for a decoded container.
///
/// # Example
///
/// ```no_run
/// use flipbook::{AcceptedContainer, FlipbookError};
///
/// let decoded = AcceptedContainer::open("animation.gif")?.decode()?;
/// let metadata = decoded.metadata();
/// println!("{} {}x{}, {} frames", metadata.version, metadata.width, metadata.height, metadata.frame_count);
/// # Ok::<(), FlipbookError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct ContainerMetadata {
    pub version: GifVersion,
    /// Logical screen width in pixels.
    pub width: u32,
    /// Logical screen height in pixels.
    pub height: u32,
    /// Number of frame records in the container.
    pub frame_count: usize,
    /// Size of the encoded container in bytes.
    pub byte_len: u64,
    /// Whether the container carries a global colour table.
    pub has_global_palette: bool,
    /// Frames declaring restore-to-background or restore-to-previous
    /// disposal. Compositing ignores disposal, so these may render
    /// differently from a GIF player.
    pub disposal_frames: usize,
    /// Frames whose patch extends past the logical screen.
    pub overflowing_frames: usize,
}

impl ContainerMetadata {
    pub fn screen(&self) -> LogicalScreen {
        LogicalScreen::new(self.width, self.height)
    }
}

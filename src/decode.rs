//! GIF decoding into frame records.
//!
//! Parsing and LZW decompression are delegated to the [`gif`] crate, asked to
//! expand every frame to RGBA. [`FrameReader`] is the streaming form: it
//! yields one [`FrameRecord`] per image descriptor without holding the rest
//! of the animation in memory. [`decode`] drains a reader into a
//! [`DecodedContainer`].

use std::io::Cursor;

use gif::{ColorOutput, DecodeOptions, Decoder, DisposalMethod};

use crate::container::DecodedContainer;
use crate::error::FlipbookError;
use crate::frame::{FrameRecord, LogicalScreen};
use crate::metadata::{ContainerMetadata, GifVersion};

/// Lazy iterator over the frame records of an in-memory GIF.
///
/// Yields `Err` at most once; the iterator is fused after a decode error.
pub struct FrameReader<'a> {
    /// `None` for a container with no image descriptors.
    decoder: Option<Decoder<Cursor<&'a [u8]>>>,
    version: GifVersion,
    byte_len: u64,
    screen: LogicalScreen,
    has_global_palette: bool,
    frames_read: usize,
    disposal_frames: usize,
    overflowing_frames: usize,
    done: bool,
}

impl<'a> FrameReader<'a> {
    /// Read the GIF header and logical screen descriptor from `bytes`.
    ///
    /// # Errors
    ///
    /// Returns [`FlipbookError::NotAGif`] if the signature is missing, or
    /// [`FlipbookError::DecodeError`] if the header cannot be parsed.
    pub fn new(bytes: &'a [u8]) -> Result<Self, FlipbookError> {
        let version = GifVersion::sniff(bytes).ok_or(FlipbookError::NotAGif)?;

        let mut options = DecodeOptions::new();
        options.set_color_output(ColorOutput::RGBA);
        let decoder = match options.read_info(Cursor::new(bytes)) {
            Ok(decoder) => decoder,
            Err(error) => {
                return match frameless_screen(bytes) {
                    Some((screen, has_global_palette)) => {
                        log::debug!(
                            "{version} container has no frames: {}x{} logical screen",
                            screen.width,
                            screen.height,
                        );
                        Ok(Self {
                            decoder: None,
                            version,
                            byte_len: bytes.len() as u64,
                            screen,
                            has_global_palette,
                            frames_read: 0,
                            disposal_frames: 0,
                            overflowing_frames: 0,
                            done: true,
                        })
                    }
                    None => Err(error.into()),
                };
            }
        };

        let screen = LogicalScreen::new(u32::from(decoder.width()), u32::from(decoder.height()));
        let has_global_palette = decoder.global_palette().is_some();
        log::debug!(
            "Reading {version} container: {}x{} logical screen, {} bytes",
            screen.width,
            screen.height,
            bytes.len(),
        );

        Ok(Self {
            decoder: Some(decoder),
            version,
            byte_len: bytes.len() as u64,
            screen,
            has_global_palette,
            frames_read: 0,
            disposal_frames: 0,
            overflowing_frames: 0,
            done: false,
        })
    }

    pub fn screen(&self) -> LogicalScreen {
        self.screen
    }

    /// Metadata for the frames read so far.
    ///
    /// Complete once the iterator has returned `None`.
    pub fn metadata(&self) -> ContainerMetadata {
        ContainerMetadata {
            version: self.version,
            width: self.screen.width,
            height: self.screen.height,
            frame_count: self.frames_read,
            byte_len: self.byte_len,
            has_global_palette: self.has_global_palette,
            disposal_frames: self.disposal_frames,
            overflowing_frames: self.overflowing_frames,
        }
    }
}

impl Iterator for FrameReader<'_> {
    type Item = Result<FrameRecord, FlipbookError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let decoder = self.decoder.as_mut()?;

        let (record, restores) = match decoder.read_next_frame() {
            Ok(Some(frame)) => (
                FrameRecord::new(
                    u32::from(frame.left),
                    u32::from(frame.top),
                    u32::from(frame.width),
                    u32::from(frame.height),
                    frame.buffer.to_vec(),
                ),
                matches!(
                    frame.dispose,
                    DisposalMethod::Background | DisposalMethod::Previous
                ),
            ),
            Ok(None) => {
                self.done = true;
                return None;
            }
            Err(error) => {
                self.done = true;
                return Some(Err(error.into()));
            }
        };

        if restores {
            self.disposal_frames += 1;
        }
        if record.exceeds(self.screen) {
            self.overflowing_frames += 1;
        }
        self.frames_read += 1;

        Some(Ok(record))
    }
}

/// Logical screen of a GIF whose data stream ends before any image
/// descriptor, skipping over extension blocks.
///
/// The `gif` decoder treats such a stream as truncated; it is a valid
/// animation with zero frames.
fn frameless_screen(bytes: &[u8]) -> Option<(LogicalScreen, bool)> {
    let descriptor = bytes.get(6..13)?;
    let width = u16::from_le_bytes([descriptor[0], descriptor[1]]);
    let height = u16::from_le_bytes([descriptor[2], descriptor[3]]);
    let flags = descriptor[4];

    let has_global_palette = flags & 0x80 != 0;
    let mut pos = 13;
    if has_global_palette {
        pos += 3 << ((flags & 0x07) + 1);
    }

    loop {
        match *bytes.get(pos)? {
            // trailer
            0x3B => break,
            // extension introducer, label, then sub-blocks up to a zero length
            0x21 => {
                pos += 2;
                loop {
                    let len = usize::from(*bytes.get(pos)?);
                    pos += 1 + len;
                    if len == 0 {
                        break;
                    }
                }
            }
            _ => return None,
        }
    }

    Some((
        LogicalScreen::new(u32::from(width), u32::from(height)),
        has_global_palette,
    ))
}

/// Decode every frame of an in-memory GIF.
///
/// # Errors
///
/// Returns [`FlipbookError::NotAGif`] or [`FlipbookError::DecodeError`].
pub fn decode(bytes: &[u8]) -> Result<DecodedContainer, FlipbookError> {
    let mut reader = FrameReader::new(bytes)?;
    let mut frames = Vec::new();
    for record in reader.by_ref() {
        frames.push(record?);
    }

    let metadata = reader.metadata();
    log::debug!(
        "Decoded {} frames ({} with restoring disposal, {} overflowing)",
        metadata.frame_count,
        metadata.disposal_frames,
        metadata.overflowing_frames,
    );

    Ok(DecodedContainer::new(frames, metadata))
}

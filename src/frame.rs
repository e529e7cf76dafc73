//! Frame-level data types shared by the decoder and the compositor.

use image::RgbaImage;

/// Bytes per pixel in a [`FrameRecord`] buffer (interleaved RGBA).
pub const BYTES_PER_PIXEL: usize = 4;

/// The fixed canvas of one container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LogicalScreen {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
}

impl LogicalScreen {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// `true` when neither dimension is zero.
    pub fn is_drawable(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// One decoded animation frame: an RGBA patch plus its placement inside the
/// logical screen.
///
/// `pixels` is row-major, interleaved RGBA, and must be exactly
/// `width * height * 4` bytes long.
#[derive(Clone, PartialEq, Eq)]
pub struct FrameRecord {
    /// Left offset of the patch in the logical screen.
    pub left: u32,
    /// Top offset of the patch in the logical screen.
    pub top: u32,
    /// Patch width.
    pub width: u32,
    /// Patch height.
    pub height: u32,
    /// Raw RGBA bytes.
    pub pixels: Vec<u8>,
}

impl std::fmt::Debug for FrameRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameRecord")
            .field("left", &self.left)
            .field("top", &self.top)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("pixel_bytes", &self.pixels.len())
            .finish()
    }
}

impl FrameRecord {
    pub fn new(left: u32, top: u32, width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            left,
            top,
            width,
            height,
            pixels,
        }
    }

    /// A patch filled with a single RGBA colour.
    pub fn solid(left: u32, top: u32, width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let count = width as usize * height as usize;
        let pixels = rgba.repeat(count);
        Self::new(left, top, width, height, pixels)
    }

    /// Number of bytes `pixels` must hold for the declared dimensions.
    pub fn expected_len(&self) -> usize {
        self.width as usize * self.height as usize * BYTES_PER_PIXEL
    }

    /// `true` when some part of the patch lies outside `screen`.
    pub fn exceeds(&self, screen: LogicalScreen) -> bool {
        u64::from(self.left) + u64::from(self.width) > u64::from(screen.width)
            || u64::from(self.top) + u64::from(self.height) > u64::from(screen.height)
    }
}

/// What happened to a frame's patch when it was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// The whole patch fit on the canvas.
    Full,
    /// Part of the patch fell outside the canvas and was dropped.
    Clipped,
    /// The patch was out of bounds and not applied at all.
    Skipped,
}

/// A standalone composited frame.
///
/// `image` is an owned copy of the accumulator taken right after the frame
/// was applied; later frames never change it.
#[derive(Debug, Clone)]
pub struct CompositedFrame {
    /// Position of the frame in the input sequence.
    pub index: usize,
    /// Full-canvas RGBA image.
    pub image: RgbaImage,
    pub placement: Placement,
}

impl CompositedFrame {
    /// Consume the frame, keeping only its image.
    pub fn into_image(self) -> RgbaImage {
        self.image
    }
}

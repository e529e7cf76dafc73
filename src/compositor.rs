//! Frame compositing.
//!
//! A GIF frame only describes the sub-rectangle of pixels that changed. The
//! [`Compositor`] keeps an accumulator surface the size of the logical
//! screen, overwrites each incoming patch at its offset, and hands back an
//! owned copy of the whole surface after every frame, so each output stands
//! on its own.
//!
//! # Example
//!
//! ```
//! use flipbook::{FlipbookError, FrameRecord, composite};
//!
//! let red = [255, 0, 0, 255];
//! let blue = [0, 0, 255, 255];
//! let frames = vec![
//!     FrameRecord::solid(0, 0, 4, 4, red),
//!     FrameRecord::solid(1, 1, 2, 2, blue),
//! ];
//!
//! let images = composite(4, 4, &frames)?;
//! assert_eq!(images.len(), 2);
//! assert_eq!(images[1].get_pixel(0, 0).0, red);
//! assert_eq!(images[1].get_pixel(2, 2).0, blue);
//! # Ok::<(), FlipbookError>(())
//! ```

use image::RgbaImage;

use crate::configuration::{CompositeOptions, GeometryPolicy, OverlayMode};
use crate::error::FlipbookError;
use crate::frame::{BYTES_PER_PIXEL, CompositedFrame, FrameRecord, LogicalScreen, Placement};
use crate::progress::{OperationType, ProgressTracker};

/// Stateful compositor for one container.
///
/// The accumulator is allocated on the first [`push`](Compositor::push) and
/// is never exposed; callers only ever see copies.
#[derive(Debug, Clone)]
pub struct Compositor {
    screen: LogicalScreen,
    accumulator: Option<RgbaImage>,
    geometry_policy: GeometryPolicy,
    overlay_mode: OverlayMode,
    frames_applied: usize,
}

impl Compositor {
    /// Create a compositor for a `width`×`height` canvas with default
    /// policies.
    ///
    /// # Errors
    ///
    /// Returns [`FlipbookError::InvalidCanvas`] if either dimension is zero.
    pub fn new(width: u32, height: u32) -> Result<Self, FlipbookError> {
        Self::with_options(width, height, &CompositeOptions::default())
    }

    /// Create a compositor taking its geometry policy and overlay mode from
    /// `options`.
    ///
    /// # Errors
    ///
    /// Returns [`FlipbookError::InvalidCanvas`] if either dimension is zero.
    pub fn with_options(
        width: u32,
        height: u32,
        options: &CompositeOptions,
    ) -> Result<Self, FlipbookError> {
        let screen = LogicalScreen::new(width, height);
        if !screen.is_drawable() {
            return Err(FlipbookError::InvalidCanvas { width, height });
        }

        Ok(Self {
            screen,
            accumulator: None,
            geometry_policy: options.geometry_policy,
            overlay_mode: options.overlay_mode,
            frames_applied: 0,
        })
    }

    pub fn screen(&self) -> LogicalScreen {
        self.screen
    }

    /// Number of frames pushed so far.
    pub fn frames_applied(&self) -> usize {
        self.frames_applied
    }

    /// Apply the next frame record and return a snapshot of the result.
    ///
    /// # Errors
    ///
    /// Returns [`FlipbookError::PatchLengthMismatch`] when the record's
    /// buffer does not match its dimensions, or
    /// [`FlipbookError::PatchOutOfBounds`] when the patch leaves the canvas
    /// under [`GeometryPolicy::Reject`]. The accumulator is unchanged on
    /// error.
    pub fn push(&mut self, record: &FrameRecord) -> Result<CompositedFrame, FlipbookError> {
        let index = self.frames_applied;
        check_patch_len(index, record)?;

        let placement = self.apply(index, record)?;
        self.frames_applied += 1;

        Ok(CompositedFrame {
            index,
            image: self.snapshot(),
            placement,
        })
    }

    /// A pixel-exact copy of the current accumulator.
    ///
    /// Before the first frame this is a blank (all-zero) canvas.
    pub fn snapshot(&self) -> RgbaImage {
        match &self.accumulator {
            Some(surface) => surface.clone(),
            None => RgbaImage::new(self.screen.width, self.screen.height),
        }
    }

    fn apply(&mut self, index: usize, record: &FrameRecord) -> Result<Placement, FlipbookError> {
        let screen = self.screen;
        let out_of_bounds = record.exceeds(screen);

        if out_of_bounds {
            match self.geometry_policy {
                GeometryPolicy::Reject => {
                    return Err(FlipbookError::PatchOutOfBounds {
                        frame_index: index,
                        left: record.left,
                        top: record.top,
                        width: record.width,
                        height: record.height,
                        canvas_width: screen.width,
                        canvas_height: screen.height,
                    });
                }
                GeometryPolicy::Skip => {
                    log::warn!(
                        "Skipping frame {index}: {}x{} patch at ({}, {}) exceeds {}x{} canvas",
                        record.width,
                        record.height,
                        record.left,
                        record.top,
                        screen.width,
                        screen.height,
                    );
                    return Ok(Placement::Skipped);
                }
                GeometryPolicy::Clip => {
                    log::debug!(
                        "Clipping frame {index}: {}x{} patch at ({}, {})",
                        record.width,
                        record.height,
                        record.left,
                        record.top,
                    );
                }
            }
        }

        let mode = self.overlay_mode;
        overlay(self.surface(), record, mode);

        Ok(if out_of_bounds {
            Placement::Clipped
        } else {
            Placement::Full
        })
    }

    fn surface(&mut self) -> &mut RgbaImage {
        let LogicalScreen { width, height } = self.screen;
        self.accumulator
            .get_or_insert_with(|| RgbaImage::new(width, height))
    }
}

/// Composite `frames` onto a `width`×`height` canvas with default options.
///
/// Returns one full-canvas image per input frame, in order. An empty
/// sequence yields an empty vector.
///
/// # Errors
///
/// See [`composite_with_options`].
pub fn composite(
    width: u32,
    height: u32,
    frames: &[FrameRecord],
) -> Result<Vec<RgbaImage>, FlipbookError> {
    let composited = composite_with_options(width, height, frames, &CompositeOptions::default())?;
    Ok(composited
        .into_iter()
        .map(CompositedFrame::into_image)
        .collect())
}

/// Composite `frames` with progress, cancellation and policy settings.
///
/// Every record's buffer length is checked before anything is composited,
/// so a malformed record produces no output at all.
///
/// # Errors
///
/// - [`FlipbookError::InvalidCanvas`] for a zero dimension.
/// - [`FlipbookError::PatchLengthMismatch`] for a malformed record.
/// - [`FlipbookError::PatchOutOfBounds`] under [`GeometryPolicy::Reject`].
/// - [`FlipbookError::Cancelled`] if the token fires between frames.
pub fn composite_with_options(
    width: u32,
    height: u32,
    frames: &[FrameRecord],
    options: &CompositeOptions,
) -> Result<Vec<CompositedFrame>, FlipbookError> {
    log::debug!(
        "Compositing {} frames onto {}x{} canvas (policy={:?}, overlay={:?})",
        frames.len(),
        width,
        height,
        options.geometry_policy,
        options.overlay_mode,
    );

    let mut compositor = Compositor::with_options(width, height, options)?;
    for (index, record) in frames.iter().enumerate() {
        check_patch_len(index, record)?;
    }

    let mut tracker = ProgressTracker::new(
        options.progress.clone(),
        OperationType::Compositing,
        Some(frames.len() as u64),
        options.batch_size,
    );

    let mut output = Vec::with_capacity(frames.len());
    for record in frames {
        options.check_cancelled()?;
        let frame = compositor.push(record)?;
        tracker.advance(Some(frame.index));
        output.push(frame);
    }
    tracker.finish();

    Ok(output)
}

fn check_patch_len(frame_index: usize, record: &FrameRecord) -> Result<(), FlipbookError> {
    let expected = record.expected_len();
    if record.pixels.len() != expected {
        return Err(FlipbookError::PatchLengthMismatch {
            frame_index,
            expected,
            actual: record.pixels.len(),
        });
    }
    Ok(())
}

/// Write the visible part of `record` onto `surface`, one row run at a time.
fn overlay(surface: &mut RgbaImage, record: &FrameRecord, mode: OverlayMode) {
    let canvas_width = surface.width() as usize;
    let canvas_height = surface.height() as usize;
    let left = record.left as usize;
    let top = record.top as usize;

    if left >= canvas_width || top >= canvas_height {
        return;
    }

    let visible_width = (record.width as usize).min(canvas_width - left);
    let visible_height = (record.height as usize).min(canvas_height - top);
    if visible_width == 0 || visible_height == 0 {
        return;
    }

    let patch_stride = record.width as usize * BYTES_PER_PIXEL;
    let canvas_stride = canvas_width * BYTES_PER_PIXEL;
    let run = visible_width * BYTES_PER_PIXEL;
    let buffer: &mut [u8] = &mut **surface;

    for row in 0..visible_height {
        let source_start = row * patch_stride;
        let target_start = (top + row) * canvas_stride + left * BYTES_PER_PIXEL;
        let source = &record.pixels[source_start..source_start + run];
        let target = &mut buffer[target_start..target_start + run];

        match mode {
            OverlayMode::Replace => target.copy_from_slice(source),
            OverlayMode::SkipTransparent => {
                for (to, from) in target
                    .chunks_exact_mut(BYTES_PER_PIXEL)
                    .zip(source.chunks_exact(BYTES_PER_PIXEL))
                {
                    if from[3] != 0 {
                        to.copy_from_slice(from);
                    }
                }
            }
        }
    }
}

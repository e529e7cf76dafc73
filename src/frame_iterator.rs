//! Lazy, pull-based compositing.
//!
//! [`FrameIterator`] wraps a [`Compositor`] and a source of frame records and
//! composites one frame per call to [`next()`](Iterator::next). Paired with a
//! [`FrameReader`](crate::FrameReader) it decodes and composites on demand,
//! so only the accumulator and the current frame are held in memory.
//!
//! # Example
//!
//! ```no_run
//! use flipbook::{AcceptedContainer, CompositeOptions, FlipbookError};
//!
//! let container = AcceptedContainer::open("animation.gif")?;
//! for result in container.frame_iter(&CompositeOptions::new())? {
//!     let frame = result?;
//!     frame.image.save(format!("frame_{:04}.png", frame.index + 1))?;
//! }
//! # Ok::<(), FlipbookError>(())
//! ```

use std::iter::FusedIterator;

use crate::compositor::Compositor;
use crate::configuration::CompositeOptions;
use crate::error::FlipbookError;
use crate::frame::{CompositedFrame, FrameRecord};
use crate::progress::{OperationType, ProgressTracker};

/// A lazy iterator over composited frames.
///
/// Cancellation is checked before each frame is pulled from the source. The
/// iterator yields at most one `Err` and is fused afterwards.
pub struct FrameIterator<I> {
    compositor: Compositor,
    source: I,
    options: CompositeOptions,
    tracker: ProgressTracker,
    done: bool,
}

impl<I> FrameIterator<I>
where
    I: Iterator<Item = Result<FrameRecord, FlipbookError>>,
{
    /// Create an iterator that feeds `source` through `compositor`.
    ///
    /// The progress total is taken from the source's size hint when it is
    /// exact.
    pub fn new(compositor: Compositor, source: I, options: CompositeOptions) -> Self {
        let total = match source.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(lower as u64),
            _ => None,
        };
        let tracker = ProgressTracker::new(
            options.progress.clone(),
            OperationType::Compositing,
            total,
            options.batch_size,
        );

        Self {
            compositor,
            source,
            options,
            tracker,
            done: false,
        }
    }

    /// Number of frames composited so far.
    pub fn frames_applied(&self) -> usize {
        self.compositor.frames_applied()
    }
}

impl<I> Iterator for FrameIterator<I>
where
    I: Iterator<Item = Result<FrameRecord, FlipbookError>>,
{
    type Item = Result<CompositedFrame, FlipbookError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        if let Err(error) = self.options.check_cancelled() {
            self.done = true;
            return Some(Err(error));
        }

        let record = match self.source.next() {
            Some(Ok(record)) => record,
            Some(Err(error)) => {
                self.done = true;
                return Some(Err(error));
            }
            None => {
                self.done = true;
                self.tracker.finish();
                return None;
            }
        };

        match self.compositor.push(&record) {
            Ok(frame) => {
                self.tracker.advance(Some(frame.index));
                Some(Ok(frame))
            }
            Err(error) => {
                self.done = true;
                Some(Err(error))
            }
        }
    }
}

impl<I> FusedIterator for FrameIterator<I> where
    I: Iterator<Item = Result<FrameRecord, FlipbookError>>
{
}

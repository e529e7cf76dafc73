//! Progress reporting and cancellation.
//!
//! Compositing and export both walk a known number of frames (or pages), so
//! progress is reported as a count against a total. A [`ProgressCallback`]
//! receives [`ProgressInfo`] snapshots; a [`CancellationToken`] stops the
//! work at the next frame boundary.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use flipbook::{
//!     AcceptedContainer, CompositeOptions, FlipbookError, ProgressCallback, ProgressInfo,
//! };
//!
//! struct PrintProgress;
//!
//! impl ProgressCallback for PrintProgress {
//!     fn on_progress(&self, info: &ProgressInfo) {
//!         if let Some(pct) = info.percentage {
//!             println!("[{:?}] frame {} ({pct:.0}%)", info.operation, info.current);
//!         }
//!     }
//! }
//!
//! let options = CompositeOptions::new().with_progress(Arc::new(PrintProgress));
//! let flipbook = AcceptedContainer::open("animation.gif")?
//!     .decode()?
//!     .composite_with_options(&options)?;
//! # Ok::<(), FlipbookError>(())
//! ```

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::time::{Duration, Instant};

use crate::error::FlipbookError;

/// Which stage of the pipeline a report comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum OperationType {
    /// Overlaying frame records onto the accumulator.
    Compositing,
    /// Encoding composited frames as PNG files.
    FrameExport,
    /// Rendering and writing printable sheets.
    SheetLayout,
}

/// One progress report.
#[derive(Debug, Clone)]
pub struct ProgressInfo {
    pub operation: OperationType,
    /// Frames (or pages) finished so far.
    pub current: u64,
    /// Frames (or pages) expected, when known up front.
    pub total: Option<u64>,
    /// `current / total` as a percentage.
    pub percentage: Option<f32>,
    pub elapsed: Duration,
    /// Linear extrapolation from the average time per item.
    pub estimated_remaining: Option<Duration>,
    /// Index of the frame that was just finished, if the report follows one.
    pub current_frame: Option<usize>,
}

impl ProgressInfo {
    /// `true` once every expected item is done.
    pub fn is_complete(&self) -> bool {
        self.total.is_some_and(|total| self.current >= total)
    }
}

/// Receives progress reports.
///
/// Callbacks may fire from rayon or Tokio worker threads, hence the
/// `Send + Sync` bound. They cannot stop the work; use a
/// [`CancellationToken`] for that.
pub trait ProgressCallback: Send + Sync {
    fn on_progress(&self, info: &ProgressInfo);
}

pub(crate) struct NoOpProgress;

impl ProgressCallback for NoOpProgress {
    fn on_progress(&self, _info: &ProgressInfo) {}
}

/// A shared stop flag.
///
/// Clones share one flag, so a token handed to [`CompositeOptions`](crate::CompositeOptions)
/// can be cancelled from another thread. Compositing checks it before each
/// frame and export checks it before each file.
///
/// # Example
///
/// ```
/// use flipbook::CancellationToken;
///
/// let token = CancellationToken::new();
/// let handle = token.clone();
/// handle.cancel();
/// assert!(token.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the flag for this token and every clone of it.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    /// `Err(FlipbookError::Cancelled)` once the flag is raised.
    pub(crate) fn check(&self) -> Result<(), FlipbookError> {
        if self.is_cancelled() {
            Err(FlipbookError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Counts finished items and reports every `every` of them.
pub(crate) struct ProgressTracker {
    callback: Arc<dyn ProgressCallback>,
    operation: OperationType,
    total: Option<u64>,
    done: u64,
    last_reported: u64,
    every: u64,
    started: Instant,
}

impl ProgressTracker {
    pub(crate) fn new(
        callback: Arc<dyn ProgressCallback>,
        operation: OperationType,
        total: Option<u64>,
        every: u64,
    ) -> Self {
        Self {
            callback,
            operation,
            total,
            done: 0,
            last_reported: 0,
            every: every.max(1),
            started: Instant::now(),
        }
    }

    /// Count one finished item, reporting when a batch is full.
    pub(crate) fn advance(&mut self, frame: Option<usize>) {
        self.done += 1;
        if self.done - self.last_reported >= self.every {
            self.report(frame);
        }
    }

    /// Emit the closing report.
    pub(crate) fn finish(&mut self) {
        self.report(None);
    }

    /// Count every expected item as done and emit the closing report.
    /// Used when the items were processed elsewhere, e.g. on the rayon pool.
    #[cfg_attr(not(feature = "rayon"), allow(dead_code))]
    pub(crate) fn complete(&mut self) {
        self.done = self.total.unwrap_or(self.done);
        self.report(None);
    }

    fn report(&mut self, frame: Option<usize>) {
        self.last_reported = self.done;
        self.callback.on_progress(&self.snapshot(frame));
    }

    fn snapshot(&self, frame: Option<usize>) -> ProgressInfo {
        let elapsed = self.started.elapsed();
        let total = self.total;

        let percentage = total
            .filter(|&total| total > 0)
            .map(|total| self.done as f32 * 100.0 / total as f32);

        let estimated_remaining = match total {
            Some(total) if self.done > 0 => {
                let left = total.saturating_sub(self.done);
                Some(elapsed.mul_f64(left as f64 / self.done as f64))
            }
            _ => None,
        };

        ProgressInfo {
            operation: self.operation,
            current: self.done,
            total,
            percentage,
            elapsed,
            estimated_remaining,
            current_frame: frame,
        }
    }
}

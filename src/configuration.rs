//! Compositing and validation configuration.
//!
//! [`CompositeOptions`] is a builder that threads progress callbacks,
//! cancellation tokens, and geometry/overlay policies through compositing
//! without widening every function signature. [`ValidationOptions`] holds
//! the input acceptance limits.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use flipbook::{
//!     CancellationToken, CompositeOptions, GeometryPolicy, ProgressCallback, ProgressInfo,
//! };
//!
//! struct LogProgress;
//! impl ProgressCallback for LogProgress {
//!     fn on_progress(&self, info: &ProgressInfo) {
//!         println!("{:?}: {} done", info.operation, info.current);
//!     }
//! }
//!
//! let token = CancellationToken::new();
//! let options = CompositeOptions::new()
//!     .with_progress(Arc::new(LogProgress))
//!     .with_cancellation(token.clone())
//!     .with_geometry_policy(GeometryPolicy::Skip)
//!     .with_batch_size(10);
//! ```

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;

use crate::error::FlipbookError;
use crate::progress::{CancellationToken, NoOpProgress, ProgressCallback};

/// Default input size ceiling: 10 MiB.
pub const DEFAULT_MAX_INPUT_BYTES: u64 = 10 * 1024 * 1024;

/// What to do with a frame patch that extends past the logical screen.
///
/// The policy applies uniformly to every frame of one compositing run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GeometryPolicy {
    /// Write the in-bounds part of the patch and drop the rest. The default.
    #[default]
    Clip,
    /// Leave the accumulator untouched for that frame. A snapshot is still
    /// emitted, tagged [`Placement::Skipped`](crate::Placement::Skipped).
    Skip,
    /// Abort the whole run with
    /// [`FlipbookError::PatchOutOfBounds`](crate::FlipbookError::PatchOutOfBounds).
    Reject,
}

/// How patch pixels are written onto the accumulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlayMode {
    /// Plain overwrite: every covered pixel takes the patch value, including
    /// fully transparent ones. The default.
    #[default]
    Replace,
    /// Patch pixels with zero alpha leave the accumulator pixel unchanged,
    /// matching how a browser canvas draws a patch with transparent holes.
    SkipTransparent,
}

/// Configuration for compositing operations.
///
/// All fields have sensible defaults: a default-constructed value clips
/// out-of-bounds patches, overwrites pixels, never cancels and reports to
/// nobody.
#[derive(Clone)]
pub struct CompositeOptions {
    /// Progress callback. Defaults to a no-op.
    pub(crate) progress: Arc<dyn ProgressCallback>,
    /// Cancellation token. `None` means never cancelled.
    pub(crate) cancellation: Option<CancellationToken>,
    /// Fire the progress callback every N frames.
    pub(crate) batch_size: u64,
    pub(crate) geometry_policy: GeometryPolicy,
    pub(crate) overlay_mode: OverlayMode,
}

impl Debug for CompositeOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("CompositeOptions")
            .field("has_cancellation", &self.cancellation.is_some())
            .field("batch_size", &self.batch_size)
            .field("geometry_policy", &self.geometry_policy)
            .field("overlay_mode", &self.overlay_mode)
            .finish()
    }
}

impl Default for CompositeOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl CompositeOptions {
    /// Create options with default settings.
    pub fn new() -> Self {
        Self {
            progress: Arc::new(NoOpProgress),
            cancellation: None,
            batch_size: 1,
            geometry_policy: GeometryPolicy::default(),
            overlay_mode: OverlayMode::default(),
        }
    }

    /// Attach a progress callback.
    #[must_use]
    pub fn with_progress(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress = callback;
        self
    }

    /// Attach a cancellation token.
    ///
    /// The token is checked before each frame; once cancelled, compositing
    /// stops and returns [`FlipbookError::Cancelled`](crate::FlipbookError::Cancelled).
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Set how often the progress callback fires. Clamped to at least 1.
    #[must_use]
    pub fn with_batch_size(mut self, size: u64) -> Self {
        self.batch_size = size.max(1);
        self
    }

    /// Set the out-of-bounds patch policy.
    #[must_use]
    pub fn with_geometry_policy(mut self, policy: GeometryPolicy) -> Self {
        self.geometry_policy = policy;
        self
    }

    /// Set the overlay mode.
    #[must_use]
    pub fn with_overlay_mode(mut self, mode: OverlayMode) -> Self {
        self.overlay_mode = mode;
        self
    }

    pub fn geometry_policy(&self) -> GeometryPolicy {
        self.geometry_policy
    }

    pub fn overlay_mode(&self) -> OverlayMode {
        self.overlay_mode
    }

    /// `Err(FlipbookError::Cancelled)` once the attached token fires.
    pub(crate) fn check_cancelled(&self) -> Result<(), FlipbookError> {
        match &self.cancellation {
            Some(token) => token.check(),
            None => Ok(()),
        }
    }
}

/// Input acceptance limits applied before any decoding happens.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct ValidationOptions {
    /// Largest accepted input, in bytes.
    pub max_input_bytes: u64,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
        }
    }
}

impl ValidationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the size ceiling in bytes.
    pub fn with_max_input_bytes(mut self, limit: u64) -> Self {
        self.max_input_bytes = limit;
        self
    }
}

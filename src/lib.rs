//! # flipbook
//!
//! Turn animated GIFs into flipbooks: one fully composited, standalone image
//! per animation frame, ready to print, cut, and stack.
//!
//! A GIF frame usually stores only the rectangle of pixels that changed since
//! the previous frame. `flipbook` replays those patches onto an accumulator
//! the size of the logical screen and snapshots it after every frame, so each
//! output image shows exactly what the animation looks like at that point.
//!
//! ## Quick Start
//!
//! ### Composite a GIF file
//!
//! ```no_run
//! use flipbook::AcceptedContainer;
//!
//! let flipbook = AcceptedContainer::open("animation.gif")
//!     .unwrap()
//!     .decode()
//!     .unwrap()
//!     .composite()
//!     .unwrap();
//! flipbook.save_frames("frames").unwrap();
//! ```
//!
//! ### Composite frame records directly
//!
//! ```
//! use flipbook::{FrameRecord, composite};
//!
//! let frames = vec![
//!     FrameRecord::solid(0, 0, 4, 4, [255, 0, 0, 255]),
//!     FrameRecord::solid(1, 1, 2, 2, [0, 0, 255, 255]),
//! ];
//! let images = composite(4, 4, &frames).unwrap();
//! assert_eq!(images.len(), 2);
//! ```
//!
//! ### Print sheets
//!
//! ```no_run
//! use flipbook::{AcceptedContainer, SheetOptions};
//!
//! let flipbook = AcceptedContainer::open("animation.gif")
//!     .unwrap()
//!     .decode()
//!     .unwrap()
//!     .composite()
//!     .unwrap();
//! flipbook.save_sheets("sheets", &SheetOptions::new(3, 4)).unwrap();
//! ```
//!
//! ## Pipeline
//!
//! Inputs pass through explicit stages, each its own type:
//!
//! 1. **Validate**: [`AcceptedContainer`] rejects empty, oversize (10 MiB by
//!    default) and non-GIF input.
//! 2. **Decode**: [`DecodedContainer`] holds the logical screen and
//!    [`FrameRecord`]s (or stream them with [`FrameReader`]).
//! 3. **Composite**: [`Flipbook`] holds one [`CompositedFrame`] per record
//!    (or composite lazily with [`FrameIterator`]).
//! 4. **Render**: PNG frames or printable sheets.
//!
//! Compositing is a cumulative overlay. GIF disposal methods
//! (restore-to-background, restore-to-previous) are not applied; the
//! [`ValidationReport`] warns when a container declares them.
//!
//! ### Optional Features
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `async` | `FrameStream` composites on a Tokio blocking thread |
//! | `rayon` | Parallel PNG encoding in `Flipbook::save_frames*` |
//! | `full` | Enables all of the above |

pub mod compositor;
pub mod configuration;
pub mod container;
pub mod decode;
pub mod error;
pub mod flipbook;
pub mod frame;
pub mod frame_iterator;
pub mod metadata;
pub mod progress;
#[cfg(feature = "rayon")]
mod rayon;
pub mod sheet;
#[cfg(feature = "async")]
pub mod stream;
pub mod validation;

pub use compositor::{Compositor, composite, composite_with_options};
pub use configuration::{
    CompositeOptions, DEFAULT_MAX_INPUT_BYTES, GeometryPolicy, OverlayMode, ValidationOptions,
};
pub use container::{AcceptedContainer, DecodedContainer};
pub use decode::{FrameReader, decode};
pub use error::FlipbookError;
pub use flipbook::{Flipbook, frame_file_name};
pub use frame::{CompositedFrame, FrameRecord, LogicalScreen, Placement};
pub use frame_iterator::FrameIterator;
pub use metadata::{ContainerMetadata, GifVersion};
pub use progress::{CancellationToken, OperationType, ProgressCallback, ProgressInfo};
pub use sheet::SheetOptions;
#[cfg(feature = "async")]
pub use stream::FrameStream;
pub use validation::{
    ValidationReport, accept, validate_bytes, validate_file, validate_metadata,
};

//! Parallel frame export.
//!
//! Compositing is inherently sequential, but once every frame is an owned
//! snapshot the PNG encoding of each one is independent. This module spreads
//! that work across rayon threads. The public API is
//! [`Flipbook::save_frames_with_options`](crate::Flipbook::save_frames_with_options).

use std::path::PathBuf;

use ::rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use image::RgbaImage;

use crate::configuration::CompositeOptions;
use crate::error::FlipbookError;

/// Encode and write every `(path, image)` pair, checking cancellation
/// before each one. The first failure stops the remaining work.
pub(crate) fn save_images_parallel(
    jobs: &[(PathBuf, &RgbaImage)],
    options: &CompositeOptions,
) -> Result<(), FlipbookError> {
    log::debug!("Writing {} images on the rayon pool", jobs.len());

    jobs.par_iter().try_for_each(|(path, image)| {
        options.check_cancelled()?;
        image.save(path)?;
        Ok(())
    })
}

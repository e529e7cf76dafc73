//! The composited flipbook and its rendering to disk.

use std::fs;
use std::path::{Path, PathBuf};

use image::RgbaImage;

use crate::configuration::CompositeOptions;
use crate::error::FlipbookError;
use crate::frame::{CompositedFrame, LogicalScreen, Placement};
use crate::progress::{OperationType, ProgressTracker};
use crate::sheet::{SheetOptions, layout_sheets};

/// An ordered sequence of standalone composited frames.
///
/// Produced by [`DecodedContainer::composite`](crate::DecodedContainer::composite).
/// Every frame is a full-canvas image owned by the flipbook.
#[derive(Debug, Clone)]
pub struct Flipbook {
    screen: LogicalScreen,
    frames: Vec<CompositedFrame>,
}

impl Flipbook {
    pub(crate) fn new(screen: LogicalScreen, frames: Vec<CompositedFrame>) -> Self {
        Self { screen, frames }
    }

    pub fn screen(&self) -> LogicalScreen {
        self.screen
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frames(&self) -> &[CompositedFrame] {
        &self.frames
    }

    /// Images in frame order.
    pub fn images(&self) -> impl Iterator<Item = &RgbaImage> {
        self.frames.iter().map(|frame| &frame.image)
    }

    pub fn into_images(self) -> Vec<RgbaImage> {
        self.frames
            .into_iter()
            .map(CompositedFrame::into_image)
            .collect()
    }

    /// Indices of frames whose patch was not applied.
    pub fn skipped_frames(&self) -> Vec<usize> {
        self.indices_with(Placement::Skipped)
    }

    /// Indices of frames whose patch was cut at the canvas edge.
    pub fn clipped_frames(&self) -> Vec<usize> {
        self.indices_with(Placement::Clipped)
    }

    fn indices_with(&self, placement: Placement) -> Vec<usize> {
        self.frames
            .iter()
            .filter(|frame| frame.placement == placement)
            .map(|frame| frame.index)
            .collect()
    }

    /// Write every frame to `directory` as `frame_0001.png`, `frame_0002.png`, …
    ///
    /// The directory is created if needed. Returns the written paths in
    /// frame order.
    ///
    /// # Errors
    ///
    /// I/O and image encoding errors.
    pub fn save_frames<P: AsRef<Path>>(&self, directory: P) -> Result<Vec<PathBuf>, FlipbookError> {
        self.save_frames_with_options(directory, &CompositeOptions::default())
    }

    /// Like [`save_frames`](Flipbook::save_frames), honouring the progress
    /// callback and cancellation token in `options`.
    ///
    /// With the `rayon` feature, frames are encoded in parallel.
    ///
    /// # Errors
    ///
    /// I/O and image encoding errors, or [`FlipbookError::Cancelled`].
    pub fn save_frames_with_options<P: AsRef<Path>>(
        &self,
        directory: P,
        options: &CompositeOptions,
    ) -> Result<Vec<PathBuf>, FlipbookError> {
        let directory = directory.as_ref();
        fs::create_dir_all(directory)?;
        log::debug!(
            "Saving {} frames to {}",
            self.frames.len(),
            directory.display()
        );

        let jobs: Vec<(PathBuf, &RgbaImage)> = self
            .frames
            .iter()
            .map(|frame| (directory.join(frame_file_name(frame.index)), &frame.image))
            .collect();
        save_images(&jobs, OperationType::FrameExport, options)?;

        Ok(jobs.into_iter().map(|(path, _)| path).collect())
    }

    /// Lay the frames out on printable pages.
    ///
    /// # Errors
    ///
    /// Returns [`FlipbookError::InvalidSheetLayout`] for a zero-sized grid.
    pub fn sheets(&self, options: &SheetOptions) -> Result<Vec<RgbaImage>, FlipbookError> {
        layout_sheets(self.images(), self.screen, options)
    }

    /// Lay the frames out on printable pages and write them to `directory`
    /// as `sheet_001.png`, `sheet_002.png`, …
    ///
    /// # Errors
    ///
    /// Layout, I/O and image encoding errors.
    pub fn save_sheets<P: AsRef<Path>>(
        &self,
        directory: P,
        options: &SheetOptions,
    ) -> Result<Vec<PathBuf>, FlipbookError> {
        let directory = directory.as_ref();
        fs::create_dir_all(directory)?;

        let pages = self.sheets(options)?;
        let jobs: Vec<(PathBuf, &RgbaImage)> = pages
            .iter()
            .enumerate()
            .map(|(page, image)| (directory.join(format!("sheet_{:03}.png", page + 1)), image))
            .collect();
        save_images(&jobs, OperationType::SheetLayout, &CompositeOptions::default())?;
        log::info!(
            "Wrote {} frames on {} sheets to {}",
            self.frames.len(),
            jobs.len(),
            directory.display()
        );

        Ok(jobs.into_iter().map(|(path, _)| path).collect())
    }
}

/// File name for the frame at `index`, numbered from 1.
pub fn frame_file_name(index: usize) -> String {
    format!("frame_{:04}.png", index + 1)
}

#[cfg(feature = "rayon")]
fn save_images(
    jobs: &[(PathBuf, &RgbaImage)],
    operation: OperationType,
    options: &CompositeOptions,
) -> Result<(), FlipbookError> {
    crate::rayon::save_images_parallel(jobs, options)?;

    let mut tracker = ProgressTracker::new(
        options.progress.clone(),
        operation,
        Some(jobs.len() as u64),
        options.batch_size,
    );
    tracker.complete();
    Ok(())
}

#[cfg(not(feature = "rayon"))]
fn save_images(
    jobs: &[(PathBuf, &RgbaImage)],
    operation: OperationType,
    options: &CompositeOptions,
) -> Result<(), FlipbookError> {
    let mut tracker = ProgressTracker::new(
        options.progress.clone(),
        operation,
        Some(jobs.len() as u64),
        options.batch_size,
    );

    for (index, (path, image)) in jobs.iter().enumerate() {
        options.check_cancelled()?;
        image.save(path)?;
        tracker.advance(Some(index));
    }
    tracker.finish();

    Ok(())
}

//! Printable sheet layout.
//!
//! A sheet is one page holding a `columns × rows` grid of flipbook frames,
//! separated by gutters with dashed cut guides so the printed frames can be
//! cut apart and stacked.
//!
//! # Example
//!
//! ```no_run
//! use flipbook::{AcceptedContainer, FlipbookError, SheetOptions};
//!
//! let flipbook = AcceptedContainer::open("animation.gif")?.decode()?.composite()?;
//! let options = SheetOptions::new(3, 4).with_cell_width(400);
//! flipbook.save_sheets("sheets", &options)?;
//! # Ok::<(), FlipbookError>(())
//! ```

use image::{Rgba, RgbaImage, imageops, imageops::FilterType};

use crate::error::FlipbookError;
use crate::frame::LogicalScreen;

/// Largest page side, in pixels, that sheet layout will allocate.
pub const MAX_PAGE_SIDE: u32 = 32_768;

/// Options for sheet layout.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct SheetOptions {
    /// Cells per row.
    pub columns: u32,
    /// Rows per page.
    pub rows: u32,
    /// Cell width in pixels. Height follows the canvas aspect ratio.
    /// `None` keeps the logical screen size.
    pub cell_width: Option<u32>,
    /// Gutter between cells and around the page edge, in pixels.
    pub margin: u32,
    /// Draw dashed cut guides through the gutters.
    pub guides: bool,
    /// Length of each dash (and each gap) in pixels.
    pub dash_length: u32,
    /// Paper colour. Transparent frame pixels show this colour.
    pub background: Rgba<u8>,
    pub guide_color: Rgba<u8>,
}

impl Default for SheetOptions {
    fn default() -> Self {
        Self {
            columns: 3,
            rows: 4,
            cell_width: None,
            margin: 16,
            guides: true,
            dash_length: 6,
            background: Rgba([255, 255, 255, 255]),
            guide_color: Rgba([160, 160, 160, 255]),
        }
    }
}

impl SheetOptions {
    /// Create options for a `columns × rows` grid with default spacing.
    pub fn new(columns: u32, rows: u32) -> Self {
        Self {
            columns,
            rows,
            ..Self::default()
        }
    }

    pub fn with_cell_width(mut self, width: u32) -> Self {
        self.cell_width = Some(width);
        self
    }

    pub fn with_margin(mut self, margin: u32) -> Self {
        self.margin = margin;
        self
    }

    pub fn with_guides(mut self, guides: bool) -> Self {
        self.guides = guides;
        self
    }

    pub fn with_dash_length(mut self, length: u32) -> Self {
        self.dash_length = length;
        self
    }

    pub fn with_background(mut self, color: Rgba<u8>) -> Self {
        self.background = color;
        self
    }

    pub fn with_guide_color(mut self, color: Rgba<u8>) -> Self {
        self.guide_color = color;
        self
    }

    /// Frames per page.
    pub fn cells_per_page(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    /// Size of one cell for frames of `screen` size.
    pub fn cell_size(&self, screen: LogicalScreen) -> (u32, u32) {
        match self.cell_width {
            Some(width) if screen.width > 0 => {
                let scale = f64::from(width) / f64::from(screen.width);
                let height = (f64::from(screen.height) * scale).round() as u32;
                (width, height.max(1))
            }
            _ => (screen.width, screen.height),
        }
    }

    /// Size of one page for frames of `screen` size.
    ///
    /// # Errors
    ///
    /// Returns [`FlipbookError::InvalidSheetLayout`] if a side would exceed
    /// [`MAX_PAGE_SIDE`] pixels.
    pub fn page_size(&self, screen: LogicalScreen) -> Result<(u32, u32), FlipbookError> {
        let (cell_width, cell_height) = self.cell_size(screen);
        let width = page_side(self.columns, cell_width, self.margin);
        let height = page_side(self.rows, cell_height, self.margin);

        match (width, height) {
            (Some(width), Some(height)) => Ok((width, height)),
            _ => Err(FlipbookError::InvalidSheetLayout(format!(
                "page for a {}x{} grid of {}x{} cells with {} px margins exceeds {} px",
                self.columns, self.rows, cell_width, cell_height, self.margin, MAX_PAGE_SIDE,
            ))),
        }
    }

    fn check(&self) -> Result<(), FlipbookError> {
        if self.columns == 0 || self.rows == 0 {
            return Err(FlipbookError::InvalidSheetLayout(format!(
                "grid must have at least one cell (got {}x{})",
                self.columns, self.rows,
            )));
        }
        if self.cell_width == Some(0) {
            return Err(FlipbookError::InvalidSheetLayout(
                "cell width must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// `cells * cell + (cells + 1) * margin`, or `None` past [`MAX_PAGE_SIDE`].
fn page_side(cells: u32, cell: u32, margin: u32) -> Option<u32> {
    let content = cells.checked_mul(cell)?;
    let gutters = cells.checked_add(1)?.checked_mul(margin)?;
    content
        .checked_add(gutters)
        .filter(|&side| side <= MAX_PAGE_SIDE)
}

/// Place `images` (all of `screen` size) onto as many pages as needed.
///
/// An empty input produces no pages.
pub(crate) fn layout_sheets<'a>(
    images: impl Iterator<Item = &'a RgbaImage>,
    screen: LogicalScreen,
    options: &SheetOptions,
) -> Result<Vec<RgbaImage>, FlipbookError> {
    options.check()?;

    let (cell_width, cell_height) = options.cell_size(screen);
    let (page_width, page_height) = options.page_size(screen)?;
    let per_page = options.cells_per_page();
    log::debug!(
        "Laying out {}x{} sheets ({}x{} px, cells {}x{} px)",
        options.columns,
        options.rows,
        page_width,
        page_height,
        cell_width,
        cell_height,
    );

    let mut pages = Vec::new();
    let mut current: Option<RgbaImage> = None;

    for (index, image) in images.enumerate() {
        let slot = index % per_page;
        let page = current.get_or_insert_with(|| blank_page(page_width, page_height, options));

        let column = slot as u32 % options.columns;
        let row = slot as u32 / options.columns;
        let x = options.margin + column * (cell_width + options.margin);
        let y = options.margin + row * (cell_height + options.margin);

        if (cell_width, cell_height) == image.dimensions() {
            imageops::overlay(page, image, i64::from(x), i64::from(y));
        } else {
            let scaled = imageops::resize(image, cell_width, cell_height, FilterType::Triangle);
            imageops::overlay(page, &scaled, i64::from(x), i64::from(y));
        }

        if slot + 1 == per_page {
            pages.extend(current.take());
        }
    }
    pages.extend(current);

    Ok(pages)
}

fn blank_page(width: u32, height: u32, options: &SheetOptions) -> RgbaImage {
    let mut page = RgbaImage::from_pixel(width, height, options.background);
    if options.guides && width > 0 && height > 0 {
        draw_guides(&mut page, options);
    }
    page
}

/// Dashed lines through the middle of every gutter, across the whole page.
fn draw_guides(page: &mut RgbaImage, options: &SheetOptions) {
    let (page_width, page_height) = page.dimensions();
    // The page size was bounded by `page_side`, so these products fit.
    let cell_width = page_width.saturating_sub((options.columns + 1) * options.margin) / options.columns;
    let cell_height = page_height.saturating_sub((options.rows + 1) * options.margin) / options.rows;
    let dash = options.dash_length.max(1);
    let half = options.margin / 2;

    for row in 0..=options.rows {
        let y = (row * (cell_height + options.margin) + half).min(page_height - 1);
        for x in (0..page_width).filter(|x| (x / dash) % 2 == 0) {
            page.put_pixel(x, y, options.guide_color);
        }
    }

    for column in 0..=options.columns {
        let x = (column * (cell_width + options.margin) + half).min(page_width - 1);
        for y in (0..page_height).filter(|y| (y / dash) % 2 == 0) {
            page.put_pixel(x, y, options.guide_color);
        }
    }
}

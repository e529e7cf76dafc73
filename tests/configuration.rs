//! Configuration integration tests.

use std::sync::Arc;

use flipbook::{
    CancellationToken, CompositeOptions, DEFAULT_MAX_INPUT_BYTES, GeometryPolicy, OverlayMode,
    ProgressCallback, ProgressInfo, SheetOptions, ValidationOptions,
};

struct SilentProgress;

impl ProgressCallback for SilentProgress {
    fn on_progress(&self, _info: &ProgressInfo) {}
}

// ── CompositeOptions ───────────────────────────────────────────────

#[test]
fn composite_options_defaults() {
    let options = CompositeOptions::new();
    assert_eq!(options.geometry_policy(), GeometryPolicy::Clip);
    assert_eq!(options.overlay_mode(), OverlayMode::Replace);
}

#[test]
fn composite_options_default_trait_matches_new() {
    let from_new = format!("{:?}", CompositeOptions::new());
    let from_default = format!("{:?}", CompositeOptions::default());
    assert_eq!(from_new, from_default);
}

#[test]
fn composite_options_builder_chain() {
    let options = CompositeOptions::new()
        .with_progress(Arc::new(SilentProgress))
        .with_cancellation(CancellationToken::new())
        .with_batch_size(5)
        .with_geometry_policy(GeometryPolicy::Reject)
        .with_overlay_mode(OverlayMode::SkipTransparent);

    assert_eq!(options.geometry_policy(), GeometryPolicy::Reject);
    assert_eq!(options.overlay_mode(), OverlayMode::SkipTransparent);

    let debug = format!("{options:?}");
    assert!(debug.contains("has_cancellation: true"), "{debug}");
    assert!(debug.contains("batch_size: 5"), "{debug}");
}

#[test]
fn composite_options_debug_output() {
    let debug = format!("{:?}", CompositeOptions::new());
    assert!(debug.contains("CompositeOptions"));
    assert!(debug.contains("has_cancellation: false"));
    assert!(debug.contains("geometry_policy: Clip"));
    assert!(debug.contains("overlay_mode: Replace"));
}

#[test]
fn batch_size_is_clamped_to_one() {
    let debug = format!("{:?}", CompositeOptions::new().with_batch_size(0));
    assert!(debug.contains("batch_size: 1"), "{debug}");
}

#[test]
fn composite_options_clone_shares_token() {
    let token = CancellationToken::new();
    let options = CompositeOptions::new().with_cancellation(token.clone());
    let _clone = options.clone();

    token.cancel();
    assert!(token.is_cancelled());
}

// ── ValidationOptions ──────────────────────────────────────────────

#[test]
fn validation_options_default_limit_is_ten_mebibytes() {
    assert_eq!(DEFAULT_MAX_INPUT_BYTES, 10 * 1024 * 1024);
    assert_eq!(
        ValidationOptions::default().max_input_bytes,
        DEFAULT_MAX_INPUT_BYTES
    );
}

#[test]
fn validation_options_custom_limit() {
    let options = ValidationOptions::new().with_max_input_bytes(512);
    assert_eq!(options.max_input_bytes, 512);
}

// ── SheetOptions ───────────────────────────────────────────────────

#[test]
fn sheet_options_defaults() {
    let options = SheetOptions::default();
    assert_eq!((options.columns, options.rows), (3, 4));
    assert_eq!(options.cell_width, None);
    assert_eq!(options.margin, 16);
    assert!(options.guides);
}

#[test]
fn sheet_options_builder_chain() {
    let options = SheetOptions::new(2, 5)
        .with_cell_width(300)
        .with_margin(8)
        .with_guides(false)
        .with_dash_length(3);

    assert_eq!(options.cells_per_page(), 10);
    assert_eq!(options.cell_width, Some(300));
    assert_eq!(options.margin, 8);
    assert!(!options.guides);
    assert_eq!(options.dash_length, 3);
}

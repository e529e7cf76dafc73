//! Progress and cancellation integration tests.

mod common;

use std::sync::{Arc, Mutex};

use flipbook::{
    AcceptedContainer, CancellationToken, CompositeOptions, FlipbookError, FrameRecord,
    OperationType, ProgressCallback, ProgressInfo, composite_with_options,
};

fn sample_frames(count: u32) -> Vec<FrameRecord> {
    (0..count)
        .map(|index| FrameRecord::solid(index % 4, index % 4, 1, 1, [255, 0, 0, 255]))
        .collect()
}

// ── CancellationToken ──────────────────────────────────────────────

#[test]
fn cancellation_token_default_not_cancelled() {
    let token = CancellationToken::new();
    assert!(!token.is_cancelled());
}

#[test]
fn cancellation_token_cancel() {
    let token = CancellationToken::new();
    token.cancel();
    assert!(token.is_cancelled());
}

#[test]
fn cancellation_token_clone_shares_state() {
    let token = CancellationToken::new();
    let clone = token.clone();
    assert!(!clone.is_cancelled());

    token.cancel();
    assert!(clone.is_cancelled());
}

#[test]
fn cancellation_token_default_trait() {
    let token = CancellationToken::default();
    assert!(!token.is_cancelled());
}

#[test]
fn cancelled_compositing_returns_error() {
    let token = CancellationToken::new();
    token.cancel();

    let options = CompositeOptions::new().with_cancellation(token);
    let result = composite_with_options(4, 4, &sample_frames(10), &options);

    match result {
        Err(FlipbookError::Cancelled) => {}
        other => panic!("Expected Cancelled, got: {other:?}"),
    }
}

#[test]
fn cancelled_frame_iterator_yields_error_then_stops() {
    let bytes = common::red_then_blue_square();
    let container = AcceptedContainer::from_bytes(bytes).expect("Failed to accept fixture");

    let token = CancellationToken::new();
    let options = CompositeOptions::new().with_cancellation(token.clone());
    let mut frames = container.frame_iter(&options).expect("Failed to start");

    assert!(frames.next().expect("First frame").is_ok());
    token.cancel();
    assert!(matches!(frames.next(), Some(Err(FlipbookError::Cancelled))));
    assert!(frames.next().is_none());
}

// ── ProgressInfo ───────────────────────────────────────────────────

struct RecordingProgress {
    infos: Mutex<Vec<ProgressInfo>>,
}

impl RecordingProgress {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            infos: Mutex::new(Vec::new()),
        })
    }
}

impl ProgressCallback for RecordingProgress {
    fn on_progress(&self, info: &ProgressInfo) {
        self.infos.lock().unwrap().push(info.clone());
    }
}

#[test]
fn progress_reports_compositing_operation() {
    let recorder = RecordingProgress::new();
    let options = CompositeOptions::new()
        .with_progress(recorder.clone())
        .with_batch_size(1);

    composite_with_options(4, 4, &sample_frames(5), &options).expect("Failed to composite");

    let infos = recorder.infos.lock().unwrap();
    assert!(!infos.is_empty(), "Expected progress callbacks");
    for info in infos.iter() {
        assert_eq!(info.operation, OperationType::Compositing);
    }
}

#[test]
fn progress_current_increases() {
    let recorder = RecordingProgress::new();
    let options = CompositeOptions::new()
        .with_progress(recorder.clone())
        .with_batch_size(1);

    composite_with_options(4, 4, &sample_frames(10), &options).expect("Failed to composite");

    let infos = recorder.infos.lock().unwrap();
    for window in infos.windows(2) {
        assert!(
            window[1].current >= window[0].current,
            "Progress current should be non-decreasing",
        );
    }
}

#[test]
fn progress_final_report_is_complete() {
    let recorder = RecordingProgress::new();
    let options = CompositeOptions::new().with_progress(recorder.clone());

    composite_with_options(4, 4, &sample_frames(6), &options).expect("Failed to composite");

    let infos = recorder.infos.lock().unwrap();
    let last = infos.last().expect("Expected a final report");
    assert_eq!(last.current, 6);
    assert_eq!(last.total, Some(6));
    assert_eq!(last.percentage, Some(100.0));
}

#[test]
fn progress_batch_size_limits_reports() {
    let recorder = RecordingProgress::new();
    let options = CompositeOptions::new()
        .with_progress(recorder.clone())
        .with_batch_size(5);

    composite_with_options(4, 4, &sample_frames(10), &options).expect("Failed to composite");

    // Two batch reports plus the final one.
    assert_eq!(recorder.infos.lock().unwrap().len(), 3);
}

#[test]
fn progress_reports_frame_index() {
    let recorder = RecordingProgress::new();
    let options = CompositeOptions::new().with_progress(recorder.clone());

    composite_with_options(4, 4, &sample_frames(3), &options).expect("Failed to composite");

    let infos = recorder.infos.lock().unwrap();
    let indices: Vec<Option<usize>> = infos.iter().map(|info| info.current_frame).collect();
    assert_eq!(indices, vec![Some(0), Some(1), Some(2), None]);
}

#[test]
fn frame_export_reports_progress() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let recorder = RecordingProgress::new();
    let options = CompositeOptions::new().with_progress(recorder.clone());

    let flipbook = AcceptedContainer::from_bytes(common::red_then_blue_square())
        .expect("Failed to accept fixture")
        .decode()
        .expect("Failed to decode")
        .composite()
        .expect("Failed to composite");
    flipbook
        .save_frames_with_options(directory.path(), &options)
        .expect("Failed to save frames");

    let infos = recorder.infos.lock().unwrap();
    let last = infos.last().expect("Expected a final report");
    assert_eq!(last.operation, OperationType::FrameExport);
    assert_eq!(last.current, 2);
}

//! Async streaming of composited frames.
//!
//! [`FrameStream`] decodes and composites on a Tokio blocking thread and
//! hands frames back through a bounded channel, so CPU-heavy pixel work
//! never runs on the async executor.
//!
//! # Example
//!
//! ```no_run
//! use tokio_stream::StreamExt;
//!
//! use flipbook::{AcceptedContainer, CompositeOptions, FlipbookError};
//!
//! # async fn example() -> Result<(), FlipbookError> {
//! let container = AcceptedContainer::open("animation.gif")?;
//! let mut stream = container.frame_stream(CompositeOptions::new());
//!
//! while let Some(result) = stream.next().await {
//!     let frame = result?;
//!     frame.image.save(format!("frame_{}.png", frame.index))?;
//! }
//! # Ok(())
//! # }
//! ```

use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::mpsc::{Receiver, Sender};
use tokio::task::JoinHandle;
use tokio_stream::Stream;

use crate::configuration::CompositeOptions;
use crate::container::AcceptedContainer;
use crate::error::FlipbookError;
use crate::frame::CompositedFrame;

/// Default bounded-channel capacity. Each slot holds a full-canvas frame.
const DEFAULT_CHANNEL_CAPACITY: usize = 8;

/// A stream of composited frames produced by a background thread.
///
/// Dropping the stream closes the channel; the worker notices on its next
/// send and stops at that frame boundary.
pub struct FrameStream {
    receiver: Receiver<Result<CompositedFrame, FlipbookError>>,
    #[allow(dead_code)]
    handle: JoinHandle<()>,
}

impl Stream for FrameStream {
    type Item = Result<CompositedFrame, FlipbookError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.poll_recv(cx)
    }
}

/// Spawn the blocking worker. Must be called from within a Tokio runtime.
pub(crate) fn create_frame_stream(
    container: AcceptedContainer,
    options: CompositeOptions,
    channel_capacity: Option<usize>,
) -> FrameStream {
    let capacity = channel_capacity
        .unwrap_or(DEFAULT_CHANNEL_CAPACITY)
        .max(1);
    let (sender, receiver) = tokio::sync::mpsc::channel(capacity);

    let handle = tokio::task::spawn_blocking(move || {
        if let Err(error) = composite_blocking(&container, &options, &sender) {
            // The receiver may already be gone.
            let _ = sender.blocking_send(Err(error));
        }
    });

    FrameStream { receiver, handle }
}

fn composite_blocking(
    container: &AcceptedContainer,
    options: &CompositeOptions,
    sender: &Sender<Result<CompositedFrame, FlipbookError>>,
) -> Result<(), FlipbookError> {
    for frame in container.frame_iter(options)? {
        sender
            .blocking_send(Ok(frame?))
            .map_err(|_| FlipbookError::Cancelled)?;
    }
    Ok(())
}

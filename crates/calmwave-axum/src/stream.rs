//! Newline-delimited JSON response body for progress events.

use std::convert::Infallible;

use axum::body::Body;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use calmwave_core::ProgressReceiver;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::error;

/// Content type the web client expects for the progress stream.
pub const PROGRESS_CONTENT_TYPE: &str = "text/event-stream";

/// Stream every event as its own JSON line, flushing each as it arrives.
///
/// The body ends when the pipeline drops its emitter, which happens right
/// after the terminal event.
pub fn progress_response(receiver: ProgressReceiver) -> Response {
    let lines = UnboundedReceiverStream::new(receiver.into_inner()).filter_map(|event| {
        match event.to_line() {
            Ok(line) => Some(Ok::<_, Infallible>(line)),
            Err(e) => {
                error!(error = %e, "Failed to serialize progress event");
                None
            }
        }
    });

    (
        [
            (header::CONTENT_TYPE, PROGRESS_CONTENT_TYPE),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        Body::from_stream(lines),
    )
        .into_response()
}

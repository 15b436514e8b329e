//! Response bodies.
//!
//! # Responsibilities
//! - Stream a single text line to the client
//! - Log when the line never reached the connection
//!
//! # Design Decisions
//! - The body owns the handler's span, so the span closes only once the
//!   body is finished or dropped
//! - A failed write is logged, never retried

use axum::{
    body::{Body, Bytes},
    http::header::CONTENT_TYPE,
    response::{IntoResponse, Response},
};
use futures_util::Stream;
use std::pin::Pin;
use std::task::{Context, Poll};
use tracing::Span;

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

/// A one-chunk `text/plain` body.
///
/// If hyper drops the body before taking the chunk (the client went away or
/// the connection failed), a `Write failed` warning is emitted in `span`.
pub struct LineBody {
    line: Option<Bytes>,
    span: Span,
}

impl LineBody {
    pub fn new(line: impl Into<Bytes>, span: Span) -> Self {
        Self {
            line: Some(line.into()),
            span,
        }
    }
}

impl Stream for LineBody {
    type Item = Result<Bytes, std::io::Error>;

    fn poll_next(mut self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Poll::Ready(self.line.take().map(Ok))
    }
}

impl Drop for LineBody {
    fn drop(&mut self) {
        if let Some(line) = self.line.take() {
            tracing::warn!(
                parent: &self.span,
                bytes = line.len(),
                "Write failed: response body dropped before it was sent"
            );
        }
    }
}

impl IntoResponse for LineBody {
    fn into_response(self) -> Response {
        ([(CONTENT_TYPE, TEXT_PLAIN)], Body::from_stream(self)).into_response()
    }
}

//! Per-request tracing.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) for every request
//! - Open a span carrying the ID, method and URI so all events of a
//!   request correlate in the logs
//!
//! # Design Decisions
//! - The ID lives only in the span; forwarded requests are not modified
//! - Span level is INFO so it shows up with the default filter

use axum::http::Request;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{MakeSpan, TraceLayer};
use tracing::Span;
use uuid::Uuid;

/// Span factory tagging each request with a fresh ID.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestSpan;

impl<B> MakeSpan<B> for RequestSpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        tracing::info_span!(
            "request",
            request_id = %Uuid::new_v4(),
            method = %request.method(),
            uri = %request.uri()
        )
    }
}

/// HTTP trace layer used by both services.
pub fn trace_layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>, RequestSpan> {
    TraceLayer::new_for_http().make_span_with(RequestSpan)
}

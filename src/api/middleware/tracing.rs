//! HTTP request/response tracing middleware.

use axum::body::Body;
use axum::http::Request;
use tower_http::LatencyUnit;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{DefaultOnResponse, TraceLayer};
use tracing::{Level, Span};

/// Creates a tracing middleware tagging every request span with its listener.
///
/// # Example Logs
///
/// ```text
/// INFO request{listener="public" method=GET uri=/g?id=abc123}: finished processing request latency=1 ms status=302
/// INFO request{listener="private" method=POST uri=/url}: finished processing request latency=4 ms status=201
/// ```
pub fn layer(
    listener: &'static str,
) -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>, impl Fn(&Request<Body>) -> Span + Clone> {
    TraceLayer::new_for_http()
        .make_span_with(move |req: &Request<Body>| {
            tracing::info_span!(
                "request",
                listener,
                method = %req.method(),
                uri = %req.uri(),
            )
        })
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        )
}

//! HTTP metrics
//!
//! Per-request instrumentation middleware plus the Prometheus
//! exposition endpoint.

use std::time::Instant;

use axum::{
    Router,
    body::Body,
    extract::MatchedPath,
    http::{Request, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
    routing::get,
};
use prometheus::{Encoder, TextEncoder};

use crate::metrics::{HTTP_REQUEST_DURATION_SECONDS, HTTP_REQUESTS_TOTAL, REGISTRY};

/// Record count and latency for every routed request.
///
/// The endpoint label is the route template (`/api/v1/projects/:slug`),
/// not the raw path, so label cardinality stays bounded.
pub async fn track_requests(request: Request<Body>, next: Next) -> Response {
    let method = request.method().to_string();
    let endpoint = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_string());

    let started = Instant::now();
    let response = next.run(request).await;

    HTTP_REQUESTS_TOTAL
        .with_label_values(&[&method, &endpoint, response.status().as_str()])
        .inc();
    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[&method, &endpoint])
        .observe(started.elapsed().as_secs_f64());

    response
}

/// GET /metrics
///
/// Text-format dump of the Brickworks registry. Served without
/// authentication, like `/health`; deployments scrape it from the
/// private network.
async fn export_metrics() -> Response {
    let encoder = TextEncoder::new();

    match encoder.encode_to_string(&REGISTRY.gather()) {
        Ok(body) => ([(header::CONTENT_TYPE, encoder.format_type())], body).into_response(),
        Err(error) => {
            tracing::error!(%error, "Failed to encode metrics");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Create the metrics router
pub fn metrics_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/metrics", get(export_metrics))
}

//! Prometheus metrics for the API server.

use std::time::Instant;

use axum::body::Body;
use axum::extract::MatchedPath;
use axum::http::{Request, Response};
use axum::middleware::Next;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

/// Initialize the Prometheus metrics recorder.
/// Returns a handle that can be used to render metrics.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Metric names as constants for consistency.
pub mod names {
    // HTTP metrics
    pub const HTTP_REQUESTS_TOTAL: &str = "stroke_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "stroke_http_request_duration_seconds";
    pub const HTTP_REQUESTS_IN_FLIGHT: &str = "stroke_http_requests_in_flight";

    // Analysis metrics
    pub const ANALYSES_TOTAL: &str = "stroke_analyses_total";
    pub const FRAMES_EXTRACTED_TOTAL: &str = "stroke_frames_extracted_total";
    pub const UPLOADS_REJECTED_TOTAL: &str = "stroke_uploads_rejected_total";
    pub const UPLOAD_BYTES: &str = "stroke_upload_bytes";
}

/// Record an HTTP request.
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let labels = [
        ("method", method.to_string()),
        ("path", path.to_string()),
        ("status", status.to_string()),
    ];

    counter!(names::HTTP_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(names::HTTP_REQUEST_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record a finished analysis by outcome (`success`, `not_found`, ...).
pub fn record_analysis(outcome: &'static str, stroke: &str) {
    let labels = [("outcome", outcome.to_string()), ("stroke", stroke.to_string())];
    counter!(names::ANALYSES_TOTAL, &labels).increment(1);
}

/// Record frames handed to the remote model.
pub fn record_frames(count: usize) {
    counter!(names::FRAMES_EXTRACTED_TOTAL).increment(count as u64);
}

/// Record an upload refused before the pipeline ran.
pub fn record_upload_rejected(reason: &'static str) {
    let labels = [("reason", reason.to_string())];
    counter!(names::UPLOADS_REJECTED_TOTAL, &labels).increment(1);
}

/// Record the size of an accepted upload.
pub fn record_upload_bytes(bytes: u64) {
    histogram!(names::UPLOAD_BYTES).record(bytes as f64);
}

/// Route template for labels; unmatched paths collapse into one series.
fn route_label(request: &Request<Body>) -> String {
    request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "other".to_string())
}

/// Metrics middleware for HTTP requests.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response<Body> {
    let method = request.method().to_string();
    let path = route_label(&request);
    let start = Instant::now();

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).increment(1.0);

    let response = next.run(request).await;

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).decrement(1.0);

    let status = response.status().as_u16();
    let duration = start.elapsed().as_secs_f64();

    record_http_request(&method, &path, status, duration);

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_label_falls_back_for_unmatched() {
        let request = Request::builder()
            .uri("/api/analyze/../../etc/passwd")
            .body(Body::empty())
            .unwrap();
        assert_eq!(route_label(&request), "other");
    }
}

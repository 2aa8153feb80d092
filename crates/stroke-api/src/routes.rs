//! API routes.

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::services::{ServeDir, ServeFile};
use tracing::warn;

use crate::handlers::{analyze_video, estimate_cost, health, ready};
use crate::metrics::metrics_middleware;
use crate::middleware::{cors_layer, request_id, request_logging, security_headers};
use crate::state::AppState;

/// Create the API router.
pub fn create_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    // Only the upload route accepts large bodies
    let analyze_routes = Router::new()
        .route("/analyze", post(analyze_video))
        .layer(DefaultBodyLimit::max(state.config.max_upload_bytes));

    let api_routes = Router::new()
        .merge(analyze_routes)
        .route("/health", get(health))
        .route("/ready", get(ready))
        .route("/estimate", get(estimate_cost));

    // Metrics endpoint (if enabled)
    let metrics_routes = if let Some(handle) = metrics_handle {
        Router::new().route("/metrics", get(move || async move { handle.render() }))
    } else {
        Router::new()
    };

    let mut router = Router::new()
        .nest("/api", api_routes)
        .merge(metrics_routes);

    // Student portal
    if let Some(dir) = &state.config.frontend_dir {
        if dir.is_dir() {
            let index = dir.join("index.html");
            router = router.fallback_service(ServeDir::new(dir).fallback(ServeFile::new(index)));
        } else {
            warn!(path = %dir.display(), "FRONTEND_DIR is not a directory, portal disabled");
        }
    }

    router
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(security_headers))
        .layer(middleware::from_fn(request_logging))
        .layer(middleware::from_fn(request_id))
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}

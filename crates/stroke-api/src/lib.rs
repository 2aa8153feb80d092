//! Axum HTTP API server for tennis stroke analysis.
//!
//! This crate provides:
//! - Multipart video upload with validation and scratch-file cleanup
//! - The extract-then-analyze pipeline behind `POST /api/analyze`
//! - Health, readiness and cost estimate endpoints
//! - Security headers, request ids and Prometheus metrics

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod pipeline;
pub mod routes;
pub mod state;
pub mod upload;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use pipeline::{AnalysisPipeline, PipelineError};
pub use routes::create_router;
pub use state::AppState;

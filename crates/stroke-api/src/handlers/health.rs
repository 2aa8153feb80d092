//! Health check handlers.

use std::time::Instant;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use stroke_media::{check_ffmpeg, check_ffprobe, MediaResult};

use crate::state::AppState;

/// Health response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub api_key_set: bool,
    pub upload_dir: String,
    pub version: String,
    pub timestamp: String,
}

/// Health check endpoint (liveness probe).
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        api_key_set: state.api_key_set,
        upload_dir: state.config.upload_dir.display().to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

/// Readiness check response.
#[derive(Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub checks: ReadinessChecks,
}

#[derive(Serialize)]
pub struct ReadinessChecks {
    pub ffmpeg: CheckStatus,
    pub ffprobe: CheckStatus,
    pub api_key: CheckStatus,
    pub upload_dir: CheckStatus,
}

#[derive(Serialize)]
pub struct CheckStatus {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

impl CheckStatus {
    fn ok(latency_ms: u64) -> Self {
        Self {
            status: "ok".to_string(),
            error: None,
            latency_ms: Some(latency_ms),
        }
    }

    fn error(msg: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            error: Some(msg.into()),
            latency_ms: None,
        }
    }

    fn is_ok(&self) -> bool {
        self.status == "ok"
    }

    fn from_tool<T>(check: MediaResult<T>, start: Instant) -> Self {
        match check {
            Ok(_) => Self::ok(start.elapsed().as_millis() as u64),
            Err(e) => Self::error(e.to_string()),
        }
    }
}

/// Readiness check endpoint (readiness probe).
/// Checks the media tools, the API key and the scratch directory.
pub async fn ready(
    State(state): State<AppState>,
) -> Result<Json<ReadinessResponse>, (StatusCode, Json<ReadinessResponse>)> {
    let ffmpeg_check = {
        let start = Instant::now();
        CheckStatus::from_tool(check_ffmpeg(), start)
    };

    let ffprobe_check = {
        let start = Instant::now();
        CheckStatus::from_tool(check_ffprobe(), start)
    };

    let api_key_check = if state.api_key_set {
        CheckStatus::ok(0)
    } else {
        CheckStatus::error("ANTHROPIC_API_KEY is not configured")
    };

    let upload_dir_check = {
        let start = Instant::now();
        match tokio::fs::metadata(&state.config.upload_dir).await {
            Ok(meta) if meta.is_dir() => CheckStatus::ok(start.elapsed().as_millis() as u64),
            Ok(_) => CheckStatus::error("upload path is not a directory"),
            Err(e) => CheckStatus::error(e.to_string()),
        }
    };

    let all_ok = ffmpeg_check.is_ok()
        && ffprobe_check.is_ok()
        && api_key_check.is_ok()
        && upload_dir_check.is_ok();

    let response = ReadinessResponse {
        status: if all_ok { "ready" } else { "degraded" }.to_string(),
        checks: ReadinessChecks {
            ffmpeg: ffmpeg_check,
            ffprobe: ffprobe_check,
            api_key: api_key_check,
            upload_dir: upload_dir_check,
        },
    };

    if all_ok {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

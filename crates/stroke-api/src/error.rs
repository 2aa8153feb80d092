//! API error types.
//!
//! Every error is rendered as a failed analysis envelope so clients only
//! ever parse one response shape.

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use stroke_models::AnalysisResult;
use thiserror::Error;
use tracing::error;

pub type ApiResult<T> = Result<T, ApiError>;

/// Message shown for any failure whose details stay server-side.
pub const GENERIC_SERVER_ERROR: &str = "An unexpected server error occurred. Please try again.";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Video file is too large. Please keep it under {0}.")]
    PayloadTooLarge(String),

    #[error("Server error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Map a multipart read failure, keeping oversize bodies distinct.
    pub fn from_multipart(err: MultipartError, limit_label: &str) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Self::PayloadTooLarge(limit_label.to_string())
        } else {
            Self::BadRequest(format!("Malformed upload: {}", err.body_text()))
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Internal(_) | ApiError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Internal details are logged, never returned
        let message = match &self {
            ApiError::Internal(_) | ApiError::Io(_) => {
                error!(error = %self, "Request failed");
                GENERIC_SERVER_ERROR.to_string()
            }
            _ => self.to_string(),
        };

        (status, Json(AnalysisResult::rejected(message))).into_response()
    }
}

//! Remote analysis error types.

use thiserror::Error;

pub type CoachResult<T> = Result<T, CoachError>;

/// Failures talking to the hosted model.
#[derive(Debug, Error)]
pub enum CoachError {
    #[error("ANTHROPIC_API_KEY is not configured")]
    MissingApiKey,

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("{status} {error_type}: {message}")]
    Api {
        status: u16,
        error_type: String,
        message: String,
    },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Response contained no text")]
    EmptyResponse,
}

impl CoachError {
    pub fn api(status: u16, error_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            error_type: error_type.into(),
            message: message.into(),
        }
    }

    /// HTTP status returned by the provider, when there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

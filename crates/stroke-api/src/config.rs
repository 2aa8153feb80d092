//! API configuration.

use std::path::PathBuf;

use stroke_models::{
    DEFAULT_MAX_UPLOAD_BYTES, FFMPEG_TIMEOUT_SECS, FRAMES_TO_EXTRACT, MAX_VIDEO_DURATION_SECS,
};

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// CORS origins
    pub cors_origins: Vec<String>,
    /// Max upload size in bytes
    pub max_upload_bytes: usize,
    /// Scratch directory for uploads
    pub upload_dir: PathBuf,
    /// Frames sampled per video
    pub frames_per_video: usize,
    /// Only this many seconds of each video are sampled
    pub max_video_duration_secs: f64,
    /// FFmpeg extraction timeout
    pub ffmpeg_timeout_secs: u64,
    /// Directory holding the student portal, if served
    pub frontend_dir: Option<PathBuf>,
    /// Expose /metrics
    pub metrics_enabled: bool,
    /// Environment (development/production)
    pub environment: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            cors_origins: vec!["*".to_string()],
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            upload_dir: default_upload_dir(),
            frames_per_video: FRAMES_TO_EXTRACT,
            max_video_duration_secs: MAX_VIDEO_DURATION_SECS,
            ffmpeg_timeout_secs: FFMPEG_TIMEOUT_SECS,
            frontend_dir: None,
            metrics_enabled: true,
            environment: "development".to_string(),
        }
    }
}

impl ApiConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("API_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5000),
            cors_origins: std::env::var("CORS_ORIGINS")
                .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or_else(|_| vec!["*".to_string()]),
            max_upload_bytes: std::env::var("MAX_UPLOAD_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
            upload_dir: std::env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| default_upload_dir()),
            frames_per_video: std::env::var("FRAMES_PER_VIDEO")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|n: &usize| *n > 0)
                .unwrap_or(FRAMES_TO_EXTRACT),
            max_video_duration_secs: std::env::var("MAX_VIDEO_DURATION")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|d: &f64| *d > 0.0)
                .unwrap_or(MAX_VIDEO_DURATION_SECS),
            ffmpeg_timeout_secs: std::env::var("FFMPEG_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(FFMPEG_TIMEOUT_SECS),
            frontend_dir: std::env::var("FRONTEND_DIR").ok().map(PathBuf::from),
            metrics_enabled: std::env::var("METRICS_ENABLED")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(true),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
        }
    }

    /// Check if running in production mode.
    pub fn is_production(&self) -> bool {
        self.environment.to_lowercase() == "production"
    }

    /// Upload limit rendered for error messages ("500MB").
    pub fn max_upload_label(&self) -> String {
        format!("{}MB", self.max_upload_bytes / (1024 * 1024))
    }
}

fn default_upload_dir() -> PathBuf {
    std::env::temp_dir().join("tennis_uploads")
}

//! Evenly spaced frame extraction.

use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use stroke_models::{EncodedFrame, FRAME_JPEG_QUALITY};
use tokio::fs;
use tracing::warn;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};

/// Output filename pattern handed to FFmpeg.
const FRAME_PATTERN: &str = "frame_%03d.jpg";
const FRAME_PREFIX: &str = "frame_";
const FRAME_SUFFIX: &str = ".jpg";

/// Where and how often to sample a video.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingPlan {
    /// Seconds of video that will be sampled
    pub window_secs: f64,
    /// Seconds between sampled frames
    pub interval_secs: f64,
    pub frame_count: usize,
    /// Whether the source ran past the duration cap
    pub truncated: bool,
}

impl SamplingPlan {
    /// Spread `frame_count` samples over the first `min(duration, cap)` seconds.
    pub fn new(duration_secs: f64, cap_secs: f64, frame_count: usize) -> MediaResult<Self> {
        if !duration_secs.is_finite() || duration_secs <= 0.0 {
            return Err(MediaError::InvalidVideo(format!(
                "Video has no measurable duration ({duration_secs}s)"
            )));
        }
        if frame_count == 0 {
            return Err(MediaError::internal("Frame count must be at least 1"));
        }

        let truncated = duration_secs > cap_secs;
        let window_secs = duration_secs.min(cap_secs);

        Ok(Self {
            window_secs,
            interval_secs: window_secs / frame_count as f64,
            frame_count,
            truncated,
        })
    }

    /// FFmpeg `fps` filter emitting one frame per interval.
    pub fn fps_filter(&self) -> String {
        format!("fps=1/{:.3}", self.interval_secs)
    }
}

/// Run FFmpeg to write the planned frames as JPEGs into `out_dir`.
pub async fn extract_frames(
    video_path: &Path,
    out_dir: &Path,
    plan: &SamplingPlan,
    timeout_secs: u64,
) -> MediaResult<()> {
    if plan.truncated {
        warn!(
            window_secs = plan.window_secs,
            "Video exceeds duration cap, sampling the first {:.0}s only",
            plan.window_secs
        );
    }

    let cmd = FfmpegCommand::new(video_path, out_dir.join(FRAME_PATTERN))
        .video_filter(plan.fps_filter())
        .quality(FRAME_JPEG_QUALITY)
        .max_frames(plan.frame_count)
        .log_level("error");

    FfmpegRunner::new().with_timeout(timeout_secs).run(&cmd).await
}

/// Read every extracted frame in `dir`, in order, as base64 JPEGs.
pub async fn collect_frames(dir: &Path) -> MediaResult<Vec<EncodedFrame>> {
    let mut names = Vec::new();
    let mut entries = fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with(FRAME_PREFIX) && name.ends_with(FRAME_SUFFIX) {
            names.push(name);
        }
    }

    if names.is_empty() {
        return Err(MediaError::NoFramesExtracted);
    }

    names.sort();

    let mut frames = Vec::with_capacity(names.len());
    for (i, name) in names.iter().enumerate() {
        let bytes = fs::read(dir.join(name)).await?;
        frames.push(EncodedFrame::jpeg(i as u32 + 1, STANDARD.encode(bytes)));
    }

    Ok(frames)
}

//! Frame sampler abstraction.
//!
//! The API only depends on [`FrameSampler`], so tests can swap FFmpeg for a
//! fake that returns canned frames.

use std::path::Path;
use std::time::Instant;

use async_trait::async_trait;
use metrics::histogram;
use stroke_models::{EncodedFrame, FFMPEG_TIMEOUT_SECS, MAX_VIDEO_DURATION_SECS};
use tracing::{debug, info};

use crate::error::{MediaError, MediaResult};
use crate::frames::{collect_frames, extract_frames, SamplingPlan};
use crate::probe::probe_duration;

/// Histogram of wall time spent probing and extracting.
pub const FRAME_EXTRACTION_SECONDS: &str = "stroke_frame_extraction_seconds";

/// Produces evenly spaced frames from a video on disk.
#[async_trait]
pub trait FrameSampler: Send + Sync {
    /// Sample up to `count` frames. A single attempt, no retries.
    async fn sample(&self, video_path: &Path, count: usize) -> MediaResult<Vec<EncodedFrame>>;
}

/// FFprobe + FFmpeg backed sampler.
#[derive(Debug, Clone)]
pub struct FfmpegFrameSampler {
    max_duration_secs: f64,
    timeout_secs: u64,
}

impl Default for FfmpegFrameSampler {
    fn default() -> Self {
        Self {
            max_duration_secs: MAX_VIDEO_DURATION_SECS,
            timeout_secs: FFMPEG_TIMEOUT_SECS,
        }
    }
}

impl FfmpegFrameSampler {
    pub fn new(max_duration_secs: f64, timeout_secs: u64) -> Self {
        Self {
            max_duration_secs,
            timeout_secs,
        }
    }
}

#[async_trait]
impl FrameSampler for FfmpegFrameSampler {
    async fn sample(&self, video_path: &Path, count: usize) -> MediaResult<Vec<EncodedFrame>> {
        if !video_path.exists() {
            return Err(MediaError::FileNotFound(video_path.to_path_buf()));
        }

        let start = Instant::now();

        let duration = probe_duration(video_path).await?;
        let plan = SamplingPlan::new(duration, self.max_duration_secs, count)?;
        debug!(
            duration_secs = duration,
            interval_secs = plan.interval_secs,
            "Planned frame sampling"
        );

        // Frames live only as long as this directory.
        let scratch = tempfile::tempdir()?;
        extract_frames(video_path, scratch.path(), &plan, self.timeout_secs).await?;
        let frames = collect_frames(scratch.path()).await?;

        histogram!(FRAME_EXTRACTION_SECONDS).record(start.elapsed().as_secs_f64());

        info!(
            frames = frames.len(),
            file = %video_path.file_name().unwrap_or_default().to_string_lossy(),
            "Extracted frames"
        );

        Ok(frames)
    }
}

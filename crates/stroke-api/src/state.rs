//! Application state.

use std::sync::Arc;

use stroke_coach::{AnalysisProvider, AnthropicClient, CoachConfig};
use stroke_media::{FfmpegFrameSampler, FrameSampler};

use crate::config::ApiConfig;
use crate::pipeline::AnalysisPipeline;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub pipeline: Arc<AnalysisPipeline>,
    pub api_key_set: bool,
}

impl AppState {
    /// Wire the FFmpeg sampler and the Anthropic client.
    pub fn new(config: ApiConfig, coach: CoachConfig) -> Self {
        let sampler = FfmpegFrameSampler::new(config.max_video_duration_secs, config.ffmpeg_timeout_secs);
        let api_key_set = coach.has_api_key();

        Self::with_components(
            config,
            Arc::new(sampler),
            Arc::new(AnthropicClient::new(coach)),
            api_key_set,
        )
    }

    /// Build state around arbitrary sampler and provider implementations.
    pub fn with_components(
        config: ApiConfig,
        sampler: Arc<dyn FrameSampler>,
        provider: Arc<dyn AnalysisProvider>,
        api_key_set: bool,
    ) -> Self {
        let pipeline = AnalysisPipeline::new(sampler, provider, config.frames_per_video);

        Self {
            config,
            pipeline: Arc::new(pipeline),
            api_key_set,
        }
    }
}

//! Analysis pipeline: sample frames, then ask the model.
//!
//! A run moves `extracting -> analyzing -> done`. Any failure jumps straight
//! to `done` with a failed envelope; partial results are never returned.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use stroke_coach::{AnalysisProvider, CoachError};
use stroke_media::{FrameSampler, MediaError};
use stroke_models::{AnalysisResult, PipelineStage, StrokeType, StudentContext};
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::error::GENERIC_SERVER_ERROR;
use crate::metrics;

/// Failure categories surfaced to the caller.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Video file not found: {0}")]
    NotFound(String),

    #[error("Processing error: {0}")]
    Processing(String),

    #[error("Claude API error: {0}")]
    Remote(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl PipelineError {
    /// Message placed in the envelope. Unexpected failures stay opaque.
    pub fn user_message(&self) -> String {
        match self {
            Self::Unexpected(_) => GENERIC_SERVER_ERROR.to_string(),
            other => other.to_string(),
        }
    }

    /// Metrics label.
    pub fn outcome(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::Processing(_) => "processing_error",
            Self::Remote(_) => "remote_error",
            Self::Unexpected(_) => "unexpected_error",
        }
    }
}

impl From<MediaError> for PipelineError {
    fn from(err: MediaError) -> Self {
        match err {
            MediaError::FileNotFound(path) => Self::NotFound(path.display().to_string()),
            MediaError::Internal(msg) => Self::Unexpected(msg),
            other => Self::Processing(other.to_string()),
        }
    }
}

impl From<CoachError> for PipelineError {
    fn from(err: CoachError) -> Self {
        Self::Remote(err.to_string())
    }
}

/// Bookkeeping for a single run.
#[derive(Debug)]
pub struct PipelineRun {
    pub analysis_id: Uuid,
    stage: PipelineStage,
    started: Instant,
}

impl PipelineRun {
    pub fn new() -> Self {
        Self {
            analysis_id: Uuid::new_v4(),
            stage: PipelineStage::Extracting,
            started: Instant::now(),
        }
    }

    pub fn stage(&self) -> PipelineStage {
        self.stage
    }

    /// Move to `next`. Backward or post-terminal moves are refused.
    pub fn advance(&mut self, next: PipelineStage) -> bool {
        if !self.stage.can_advance_to(next) {
            warn!(
                analysis_id = %self.analysis_id,
                from = self.stage.as_str(),
                to = next.as_str(),
                "Refused stage transition"
            );
            return false;
        }
        self.stage = next;
        true
    }

    pub fn elapsed_ms(&self) -> u128 {
        self.started.elapsed().as_millis()
    }
}

impl Default for PipelineRun {
    fn default() -> Self {
        Self::new()
    }
}

/// Frame sampler and model provider wired together.
pub struct AnalysisPipeline {
    sampler: Arc<dyn FrameSampler>,
    provider: Arc<dyn AnalysisProvider>,
    frame_count: usize,
}

impl AnalysisPipeline {
    pub fn new(
        sampler: Arc<dyn FrameSampler>,
        provider: Arc<dyn AnalysisProvider>,
        frame_count: usize,
    ) -> Self {
        Self {
            sampler,
            provider,
            frame_count,
        }
    }

    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    /// Run one analysis. Failures are folded into the returned envelope.
    pub async fn run(
        &self,
        video_path: &Path,
        stroke: StrokeType,
        student: Option<&StudentContext>,
    ) -> AnalysisResult {
        let mut run = PipelineRun::new();
        info!(
            analysis_id = %run.analysis_id,
            stroke = stroke.as_str(),
            has_student = student.is_some(),
            "Starting analysis"
        );

        let outcome = self.execute(&mut run, video_path, stroke, student).await;
        run.advance(PipelineStage::Done);

        match outcome {
            Ok((text, frames)) => {
                info!(
                    analysis_id = %run.analysis_id,
                    frames,
                    duration_ms = %run.elapsed_ms(),
                    "Analysis complete"
                );
                metrics::record_analysis("success", stroke.as_str());
                AnalysisResult::succeeded(text, frames, stroke, student)
            }
            Err(err) => {
                error!(
                    analysis_id = %run.analysis_id,
                    error = %err,
                    duration_ms = %run.elapsed_ms(),
                    "Analysis failed"
                );
                metrics::record_analysis(err.outcome(), stroke.as_str());
                AnalysisResult::failed(err.user_message(), stroke, student)
            }
        }
    }

    async fn execute(
        &self,
        run: &mut PipelineRun,
        video_path: &Path,
        stroke: StrokeType,
        student: Option<&StudentContext>,
    ) -> Result<(String, u32), PipelineError> {
        let frames = match self.sampler.sample(video_path, self.frame_count).await {
            Ok(frames) => frames,
            Err(err) => {
                if let Some(stderr) = err.stderr() {
                    warn!(analysis_id = %run.analysis_id, stderr, "Frame extraction stderr");
                }
                return Err(err.into());
            }
        };
        if frames.is_empty() {
            return Err(MediaError::NoFramesExtracted.into());
        }
        metrics::record_frames(frames.len());

        run.advance(PipelineStage::Analyzing);
        let text = self.provider.analyze(&frames, stroke, student).await?;

        Ok((text, frames.len() as u32))
    }

    /// Run on a separate task so a panic in either stage still yields an
    /// envelope. Dropping the returned future aborts the task, so a caller
    /// that goes away never pays for the model call.
    pub async fn run_detached(
        self: Arc<Self>,
        video_path: PathBuf,
        stroke: StrokeType,
        student: Option<StudentContext>,
    ) -> AnalysisResult {
        let fallback_student = student.clone();
        let mut task = scopeguard::guard(
            tokio::spawn(async move { self.run(&video_path, stroke, student.as_ref()).await }),
            |task| task.abort(),
        );

        match (&mut *task).await {
            Ok(result) => result,
            Err(join_err) => {
                let err = PipelineError::Unexpected(join_err.to_string());
                error!(error = %err, "Analysis task aborted");
                metrics::record_analysis(err.outcome(), stroke.as_str());
                AnalysisResult::failed(err.user_message(), stroke, fallback_student.as_ref())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use stroke_coach::CoachResult;
    use stroke_media::MediaResult;
    use stroke_models::EncodedFrame;

    enum SamplerMode {
        Frames(u32),
        Fail(fn() -> MediaError),
        Panic,
    }

    struct FakeSampler(SamplerMode);

    #[async_trait]
    impl FrameSampler for FakeSampler {
        async fn sample(&self, _: &Path, count: usize) -> MediaResult<Vec<EncodedFrame>> {
            match &self.0 {
                SamplerMode::Frames(n) => Ok((1..=(*n).min(count as u32))
                    .map(|i| EncodedFrame::jpeg(i, "AAAA"))
                    .collect()),
                SamplerMode::Fail(make) => Err(make()),
                SamplerMode::Panic => panic!("sampler blew up"),
            }
        }
    }

    struct FakeProvider(Option<&'static str>);

    #[async_trait]
    impl AnalysisProvider for FakeProvider {
        async fn analyze(
            &self,
            frames: &[EncodedFrame],
            stroke: StrokeType,
            _: Option<&StudentContext>,
        ) -> CoachResult<String> {
            match self.0 {
                Some(text) => Ok(format!("{text} ({} frames, {})", frames.len(), stroke.as_str())),
                None => Err(CoachError::api(401, "authentication_error", "invalid x-api-key")),
            }
        }
    }

    fn pipeline(sampler: SamplerMode, provider: Option<&'static str>) -> Arc<AnalysisPipeline> {
        Arc::new(AnalysisPipeline::new(
            Arc::new(FakeSampler(sampler)),
            Arc::new(FakeProvider(provider)),
            10,
        ))
    }

    #[test]
    fn test_run_refuses_backward_transitions() {
        let mut run = PipelineRun::new();
        assert!(run.advance(PipelineStage::Analyzing));
        assert!(!run.advance(PipelineStage::Extracting));
        assert!(run.advance(PipelineStage::Done));
        assert!(!run.advance(PipelineStage::Done));
        assert_eq!(run.stage(), PipelineStage::Done);
    }

    #[tokio::test]
    async fn test_success_envelope() {
        let student = StudentContext {
            name: Some("Maya".into()),
            ..Default::default()
        };
        let result = pipeline(SamplerMode::Frames(10), Some("Solid unit turn"))
            .run(Path::new("/tmp/x.mp4"), StrokeType::Forehand, Some(&student))
            .await;

        assert!(result.success);
        assert_eq!(result.frames_analyzed, 10);
        assert_eq!(result.student_name, "Maya");
        assert_eq!(result.analysis.as_deref(), Some("Solid unit turn (10 frames, forehand)"));
        assert!(result.error.is_none());
    }

    #[tokio::test]
    async fn test_short_video_reports_fewer_frames() {
        let result = pipeline(SamplerMode::Frames(4), Some("ok"))
            .run(Path::new("/tmp/x.mp4"), StrokeType::Serve, None)
            .await;
        assert!(result.success);
        assert_eq!(result.frames_analyzed, 4);
    }

    #[tokio::test]
    async fn test_not_found_message() {
        let result = pipeline(
            SamplerMode::Fail(|| MediaError::FileNotFound(PathBuf::from("/tmp/gone.mp4"))),
            Some("unused"),
        )
        .run(Path::new("/tmp/gone.mp4"), StrokeType::General, None)
        .await;

        assert!(!result.success);
        assert!(result.analysis.is_none());
        assert_eq!(result.frames_analyzed, 0);
        assert_eq!(result.error.as_deref(), Some("Video file not found: /tmp/gone.mp4"));
    }

    #[tokio::test]
    async fn test_processing_error_message() {
        let result = pipeline(SamplerMode::Fail(|| MediaError::NoFramesExtracted), Some("unused"))
            .run(Path::new("/tmp/x.mp4"), StrokeType::Volley, None)
            .await;

        assert_eq!(
            result.error.as_deref(),
            Some("Processing error: No frames were extracted. Check video format.")
        );
        assert_eq!(result.stroke_type, StrokeType::Volley);
        assert_eq!(result.student_name, "Student");
    }

    #[tokio::test]
    async fn test_remote_error_message() {
        let result = pipeline(SamplerMode::Frames(10), None)
            .run(Path::new("/tmp/x.mp4"), StrokeType::Forehand, None)
            .await;

        let error = result.error.unwrap();
        assert!(error.starts_with("Claude API error: "), "{error}");
        assert!(error.contains("invalid x-api-key"));
        assert!(result.analysis.is_none());
    }

    #[tokio::test]
    async fn test_ffmpeg_stderr_reaches_the_caller() {
        let result = pipeline(
            SamplerMode::Fail(|| {
                MediaError::ffmpeg_failed(
                    "FFmpeg exited with non-zero status",
                    Some("broken.mp4: moov atom not found".into()),
                    Some(1),
                )
            }),
            Some("unused"),
        )
        .run(Path::new("/tmp/broken.mp4"), StrokeType::Forehand, None)
        .await;

        assert_eq!(
            result.error.as_deref(),
            Some("Processing error: FFmpeg failed: broken.mp4: moov atom not found")
        );
    }

    #[tokio::test]
    async fn test_empty_sample_is_processing_error() {
        let result = pipeline(SamplerMode::Frames(0), Some("unused"))
            .run(Path::new("/tmp/x.mp4"), StrokeType::General, None)
            .await;
        assert!(result.error.unwrap().starts_with("Processing error: "));
    }

    #[tokio::test]
    async fn test_internal_errors_stay_opaque() {
        let result = pipeline(
            SamplerMode::Fail(|| MediaError::internal("tempdir vanished")),
            Some("unused"),
        )
        .run(Path::new("/tmp/x.mp4"), StrokeType::General, None)
        .await;
        assert_eq!(result.error.as_deref(), Some(GENERIC_SERVER_ERROR));
    }

    #[tokio::test]
    async fn test_panic_is_contained() {
        let result = pipeline(SamplerMode::Panic, Some("unused"))
            .run_detached(PathBuf::from("/tmp/x.mp4"), StrokeType::Serve, None)
            .await;

        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some(GENERIC_SERVER_ERROR));
        assert_eq!(result.stroke_type, StrokeType::Serve);
    }
}

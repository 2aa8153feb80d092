//! Analysis envelope and pipeline stage models.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::limits::DEFAULT_STUDENT_NAME;
use crate::stroke::StrokeType;
use crate::student::StudentContext;

/// Stage of a single analysis run.
///
/// Runs only move forward: `Extracting -> Analyzing -> Done`, or straight to
/// `Done` on failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    /// Sampling frames from the upload
    #[default]
    Extracting,
    /// Waiting on the remote model
    Analyzing,
    /// Finished, successfully or not
    Done,
}

impl PipelineStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Extracting => "extracting",
            Self::Analyzing => "analyzing",
            Self::Done => "done",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Whether moving from `self` to `next` is a legal transition.
    pub fn can_advance_to(&self, next: PipelineStage) -> bool {
        !self.is_terminal() && next > *self
    }
}

/// The fixed-shape JSON object returned for every analysis request.
///
/// Exactly one of `analysis` and `error` is set, matching `success`. Build it
/// through [`AnalysisResult::succeeded`] or [`AnalysisResult::failed`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AnalysisResult {
    pub success: bool,
    pub analysis: Option<String>,
    pub frames_analyzed: u32,
    pub stroke_type: StrokeType,
    pub student_name: String,
    pub error: Option<String>,
}

impl AnalysisResult {
    pub fn succeeded(
        analysis: impl Into<String>,
        frames_analyzed: u32,
        stroke_type: StrokeType,
        student: Option<&StudentContext>,
    ) -> Self {
        Self {
            success: true,
            analysis: Some(analysis.into()),
            frames_analyzed,
            stroke_type,
            student_name: student_name(student),
            error: None,
        }
    }

    pub fn failed(
        error: impl Into<String>,
        stroke_type: StrokeType,
        student: Option<&StudentContext>,
    ) -> Self {
        Self {
            success: false,
            analysis: None,
            frames_analyzed: 0,
            stroke_type,
            student_name: student_name(student),
            error: Some(error.into()),
        }
    }

    /// Failure envelope for requests rejected before a stroke type was read.
    pub fn rejected(error: impl Into<String>) -> Self {
        Self::failed(error, StrokeType::General, None)
    }
}

/// Name reported back to the caller, defaulting to the placeholder.
pub fn student_name(student: Option<&StudentContext>) -> String {
    student
        .and_then(|s| s.name.clone())
        .unwrap_or_else(|| DEFAULT_STUDENT_NAME.to_string())
}

//! Shared data models for the stroke analysis backend.
//!
//! This crate provides Serde-serializable types for:
//! - Stroke types and student context
//! - Encoded frames passed between the sampler and the model client
//! - The analysis envelope returned by the API
//! - Upload and sampling limits
//! - Per-analysis cost estimates

pub mod analysis;
pub mod cost;
pub mod frame;
pub mod limits;
pub mod stroke;
pub mod student;

// Re-export common types
pub use analysis::{student_name, AnalysisResult, PipelineStage};
pub use cost::CostEstimate;
pub use frame::EncodedFrame;
pub use limits::*;
pub use stroke::{StrokeParseError, StrokeType};
pub use student::{StudentContext, StudentForm};

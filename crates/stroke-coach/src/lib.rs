//! Coaching prompt and hosted model client.
//!
//! Sends sampled frames plus the coaching instructions to a multimodal model
//! and returns its free-text report.

pub mod client;
pub mod config;
pub mod error;
pub mod prompt;

pub use client::{AnalysisProvider, AnthropicClient};
pub use config::CoachConfig;
pub use error::{CoachError, CoachResult};
pub use prompt::{build_user_prompt, stroke_focus, SYSTEM_PROMPT};

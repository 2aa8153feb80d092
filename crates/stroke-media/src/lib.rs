#![deny(unreachable_patterns)]
//! FFmpeg CLI wrapper for frame sampling.
//!
//! This crate provides:
//! - Type-safe FFmpeg command building
//! - A runner with a kill-on-expiry timeout and captured stderr
//! - Duration probing via FFprobe
//! - Evenly spaced frame extraction behind the [`FrameSampler`] trait

pub mod command;
pub mod error;
pub mod frames;
pub mod probe;
pub mod sampler;

pub use command::{check_ffmpeg, check_ffprobe, FfmpegCommand, FfmpegRunner};
pub use error::{MediaError, MediaResult};
pub use frames::{collect_frames, extract_frames, SamplingPlan};
pub use probe::probe_duration;
pub use sampler::{FfmpegFrameSampler, FrameSampler};

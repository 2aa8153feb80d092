//! Encoded video frames.

use serde::{Deserialize, Serialize};

use crate::limits::FRAME_MEDIA_TYPE;

/// A single still frame, base64-encoded for transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedFrame {
    /// 1-based position in the sampled sequence
    pub index: u32,
    pub media_type: String,
    /// Standard-alphabet base64 image bytes
    pub data: String,
}

impl EncodedFrame {
    /// Create a JPEG frame.
    pub fn jpeg(index: u32, data: impl Into<String>) -> Self {
        Self {
            index,
            media_type: FRAME_MEDIA_TYPE.to_string(),
            data: data.into(),
        }
    }

    /// Label sent to the model after the image ("[Frame 3]").
    pub fn label(&self) -> String {
        format!("[Frame {}]", self.index)
    }
}

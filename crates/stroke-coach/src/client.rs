//! Hosted multimodal model client (Anthropic Messages API).

use std::time::Instant;

use async_trait::async_trait;
use metrics::histogram;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use stroke_models::{EncodedFrame, StrokeType, StudentContext};
use tracing::{debug, info, warn};

use crate::config::{CoachConfig, API_VERSION};
use crate::error::{CoachError, CoachResult};
use crate::prompt::{build_user_prompt, SYSTEM_PROMPT};

/// Histogram of remote call latency.
pub const REMOTE_ANALYSIS_SECONDS: &str = "stroke_remote_analysis_seconds";

/// Turns sampled frames into a coaching report.
#[async_trait]
pub trait AnalysisProvider: Send + Sync {
    async fn analyze(
        &self,
        frames: &[EncodedFrame],
        stroke: StrokeType,
        student: Option<&StudentContext>,
    ) -> CoachResult<String>;
}

/// Messages API request.
#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: Vec<ContentBlock<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock<'a> {
    Image { source: ImageSource<'a> },
    Text { text: String },
}

#[derive(Debug, Serialize)]
struct ImageSource<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    media_type: &'a str,
    data: &'a str,
}

/// Messages API response.
#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ResponseBlock>,
}

#[derive(Debug, Deserialize)]
struct ResponseBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

/// Error body returned on non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(rename = "type")]
    kind: String,
    message: String,
}

/// Anthropic Messages API client.
pub struct AnthropicClient {
    config: CoachConfig,
    client: Client,
}

impl AnthropicClient {
    pub fn new(config: CoachConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    pub fn config(&self) -> &CoachConfig {
        &self.config
    }

    /// Image + label per frame, then the instruction block.
    fn build_content<'a>(
        frames: &'a [EncodedFrame],
        stroke: StrokeType,
        student: Option<&StudentContext>,
    ) -> Vec<ContentBlock<'a>> {
        let mut content = Vec::with_capacity(frames.len() * 2 + 1);

        for frame in frames {
            content.push(ContentBlock::Image {
                source: ImageSource {
                    kind: "base64",
                    media_type: &frame.media_type,
                    data: &frame.data,
                },
            });
            content.push(ContentBlock::Text { text: frame.label() });
        }

        content.push(ContentBlock::Text {
            text: build_user_prompt(frames.len(), stroke, student),
        });

        content
    }

    async fn call_messages_api(&self, api_key: &str, request: &MessagesRequest<'_>) -> CoachResult<String> {
        let response = self
            .client
            .post(self.config.messages_url())
            .header("x-api-key", api_key)
            .header("anthropic-version", API_VERSION)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(match serde_json::from_str::<ErrorResponse>(&body) {
                Ok(err) => CoachError::api(status.as_u16(), err.error.kind, err.error.message),
                Err(_) => CoachError::api(status.as_u16(), "http_error", body),
            });
        }

        let parsed: MessagesResponse = response
            .json()
            .await
            .map_err(|e| CoachError::Decode(e.to_string()))?;

        parsed
            .content
            .into_iter()
            .find(|block| block.kind == "text")
            .and_then(|block| block.text)
            .filter(|text| !text.trim().is_empty())
            .ok_or(CoachError::EmptyResponse)
    }
}

#[async_trait]
impl AnalysisProvider for AnthropicClient {
    async fn analyze(
        &self,
        frames: &[EncodedFrame],
        stroke: StrokeType,
        student: Option<&StudentContext>,
    ) -> CoachResult<String> {
        let api_key = self.config.api_key.as_deref().ok_or(CoachError::MissingApiKey)?;

        let request = MessagesRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            system: SYSTEM_PROMPT,
            messages: vec![Message {
                role: "user",
                content: Self::build_content(frames, stroke, student),
            }],
        };

        info!(
            frames = frames.len(),
            model = %self.config.model,
            stroke = %stroke,
            "Sending frames for analysis"
        );

        let start = Instant::now();
        let result = self.call_messages_api(api_key, &request).await;
        histogram!(REMOTE_ANALYSIS_SECONDS).record(start.elapsed().as_secs_f64());

        match &result {
            Ok(text) => debug!(chars = text.len(), "Received analysis"),
            Err(e) => warn!(error = %e, "Analysis request failed"),
        }

        result
    }
}

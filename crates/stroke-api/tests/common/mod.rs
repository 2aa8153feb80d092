#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use stroke_api::{create_router, ApiConfig, AppState};
use stroke_coach::{AnalysisProvider, CoachError, CoachResult};
use stroke_media::{FrameSampler, MediaError, MediaResult};
use stroke_models::{EncodedFrame, StrokeType, StudentContext};

pub const BOUNDARY: &str = "stroke-test-boundary";

/// What the fake sampler saw on its last call.
#[derive(Debug, Clone)]
pub struct SampleCall {
    pub path: PathBuf,
    pub existed: bool,
    pub count: usize,
}

/// Sampler that returns canned frames or a canned failure.
#[derive(Default)]
pub struct FakeSampler {
    pub frames: Option<u32>,
    pub delay: Option<Duration>,
    pub calls: Mutex<Vec<SampleCall>>,
}

impl FakeSampler {
    pub fn returning(frames: u32) -> Self {
        Self {
            frames: Some(frames),
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self::default()
    }

    /// Takes `delay` to produce its frames, like a long FFmpeg run.
    pub fn slow(frames: u32, delay: Duration) -> Self {
        Self {
            frames: Some(frames),
            delay: Some(delay),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<SampleCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl FrameSampler for FakeSampler {
    async fn sample(&self, video_path: &Path, count: usize) -> MediaResult<Vec<EncodedFrame>> {
        self.calls.lock().unwrap().push(SampleCall {
            path: video_path.to_path_buf(),
            existed: video_path.exists(),
            count,
        });

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match self.frames {
            Some(n) => Ok((1..=n.min(count as u32))
                .map(|i| EncodedFrame::jpeg(i, "AAAA"))
                .collect()),
            None => Err(MediaError::ffmpeg_failed(
                "FFmpeg exited with status 1",
                Some("moov atom not found".to_string()),
                Some(1),
            )),
        }
    }
}

/// What the fake provider was asked.
#[derive(Debug, Clone)]
pub struct AnalyzeCall {
    pub frames: usize,
    pub stroke: StrokeType,
    pub student: Option<StudentContext>,
}

/// Provider that echoes a fixed report or fails like the hosted API would.
#[derive(Default)]
pub struct FakeProvider {
    pub fail: bool,
    pub calls: Mutex<Vec<AnalyzeCall>>,
}

impl FakeProvider {
    pub fn ok() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<AnalyzeCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AnalysisProvider for FakeProvider {
    async fn analyze(
        &self,
        frames: &[EncodedFrame],
        stroke: StrokeType,
        student: Option<&StudentContext>,
    ) -> CoachResult<String> {
        self.calls.lock().unwrap().push(AnalyzeCall {
            frames: frames.len(),
            stroke,
            student: student.cloned(),
        });

        if self.fail {
            return Err(CoachError::api(529, "overloaded_error", "Overloaded"));
        }
        Ok(format!("## 🎾 Stroke Analysis: {}", stroke.display_name()))
    }
}

/// A router over fakes plus handles to inspect them.
pub struct TestApp {
    pub router: Router,
    pub sampler: Arc<FakeSampler>,
    pub provider: Arc<FakeProvider>,
    pub upload_dir: TempDir,
}

impl TestApp {
    pub fn new(sampler: FakeSampler, provider: FakeProvider) -> Self {
        Self::with_config(sampler, provider, |_| {})
    }

    pub fn with_config(
        sampler: FakeSampler,
        provider: FakeProvider,
        tweak: impl FnOnce(&mut ApiConfig),
    ) -> Self {
        let upload_dir = TempDir::new().unwrap();
        let mut config = ApiConfig {
            upload_dir: upload_dir.path().to_path_buf(),
            ..Default::default()
        };
        tweak(&mut config);

        let sampler = Arc::new(sampler);
        let provider = Arc::new(provider);
        let state = AppState::with_components(config, sampler.clone(), provider.clone(), true);

        Self {
            router: create_router(state, None),
            sampler,
            provider,
            upload_dir,
        }
    }

    /// Number of files left in the scratch directory.
    pub fn scratch_files(&self) -> usize {
        std::fs::read_dir(self.upload_dir.path()).unwrap().count()
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.send(Request::get(uri).body(Body::empty()).unwrap()).await
    }
}

/// Builder for `multipart/form-data` bodies.
#[derive(Default)]
pub struct MultipartBody {
    buf: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.buf.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, bytes: &[u8]) -> Self {
        self.buf.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                 Content-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        self.buf.extend_from_slice(bytes);
        self.buf.extend_from_slice(b"\r\n");
        self
    }

    pub fn into_request(mut self, uri: &str) -> Request<Body> {
        self.buf
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        Request::post(uri)
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(self.buf))
            .unwrap()
    }
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

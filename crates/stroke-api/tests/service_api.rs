//! Integration tests for health, readiness, estimates and shared middleware.

mod common;

use axum::http::StatusCode;
use common::{body_json, FakeProvider, FakeSampler, TestApp};

fn app() -> TestApp {
    TestApp::new(FakeSampler::returning(10), FakeProvider::ok())
}

#[tokio::test]
async fn health_reports_key_and_upload_dir() {
    let app = app();
    let response = app.get("/api/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["api_key_set"], true);
    assert_eq!(
        json["upload_dir"],
        app.upload_dir.path().display().to_string()
    );
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn responses_carry_request_id_and_security_headers() {
    let app = app();
    let response = app.get("/api/health").await;

    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("x-request-id header")
        .to_str()
        .unwrap();
    assert_eq!(request_id.len(), 36);
    assert_eq!(
        response.headers().get("x-content-type-options").unwrap(),
        "nosniff"
    );
    assert_eq!(response.headers().get("x-frame-options").unwrap(), "DENY");
}

#[tokio::test]
async fn caller_request_id_is_echoed() {
    let app = app();
    let request = axum::http::Request::get("/api/health")
        .header("x-request-id", "lesson-42")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = app.send(request).await;

    assert_eq!(response.headers().get("x-request-id").unwrap(), "lesson-42");
}

#[tokio::test]
async fn ready_always_lists_every_check() {
    let app = app();
    let response = app.get("/api/ready").await;

    // ffmpeg may or may not be installed where tests run
    assert!(matches!(
        response.status(),
        StatusCode::OK | StatusCode::SERVICE_UNAVAILABLE
    ));
    let json = body_json(response).await;
    for check in ["ffmpeg", "ffprobe", "api_key", "upload_dir"] {
        assert!(json["checks"][check]["status"].is_string(), "{check}");
    }
    assert_eq!(json["checks"]["api_key"]["status"], "ok");
    assert_eq!(json["checks"]["upload_dir"]["status"], "ok");
}

#[tokio::test]
async fn estimate_defaults_to_configured_frame_count() {
    let response = app().get("/api/estimate").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["frames"], 10);
    assert_eq!(json["estimated_input_tokens"], 16800);
    assert_eq!(json["estimated_output_tokens"], 500);
}

#[tokio::test]
async fn estimate_rejects_out_of_range_counts() {
    let app = app();
    for uri in [
        "/api/estimate?frames=0",
        "/api/estimate?frames=101",
        "/api/estimate?frames=ten",
    ] {
        let response = app.get(uri).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body_json(response).await["success"], false);
    }
}

#[tokio::test]
async fn portal_is_served_when_configured() {
    let portal = tempfile::TempDir::new().unwrap();
    std::fs::write(
        portal.path().join("index.html"),
        "<h1>SD Tennis Lessons</h1>",
    )
    .unwrap();
    let portal_dir = portal.path().to_path_buf();

    let app = TestApp::with_config(FakeSampler::returning(10), FakeProvider::ok(), |config| {
        config.frontend_dir = Some(portal_dir);
    });
    let response = app.get("/").await;

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"<h1>SD Tennis Lessons</h1>");
}

#[tokio::test]
async fn unknown_route_without_portal_is_404() {
    let response = app().get("/api/videos").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

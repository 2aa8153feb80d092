//! Video upload and analysis handler.

use axum::extract::multipart::Field;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use stroke_models::{is_allowed_video_filename, AnalysisResult, StrokeType, StudentContext, StudentForm};
use tracing::{debug, info};

use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::state::AppState;
use crate::upload::ScratchUpload;

const NO_VIDEO: &str = "No video file uploaded";
const NO_FILE_SELECTED: &str = "No file selected";
const UNSUPPORTED_FORMAT: &str = "Unsupported file format. Please upload MP4, MOV, or AVI.";

/// Fields collected from the multipart body.
#[derive(Default)]
struct AnalyzeForm {
    upload: Option<ScratchUpload>,
    saw_empty_filename: bool,
    stroke_type: Option<String>,
    student: StudentForm,
}

async fn read_text(field: Field<'_>, limit_label: &str) -> ApiResult<String> {
    field
        .text()
        .await
        .map_err(|e| ApiError::from_multipart(e, limit_label))
}

fn reject(message: &'static str, reason: &'static str) -> ApiError {
    metrics::record_upload_rejected(reason);
    ApiError::bad_request(message)
}

/// Analyze an uploaded stroke video.
///
/// Accepts `video` (file) plus optional `stroke_type`, `name`, `age`,
/// `level` and `concerns` text fields. The upload is validated before
/// anything touches disk and removed once the response is built.
pub async fn analyze_video(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<(StatusCode, Json<AnalysisResult>)> {
    let mut multipart = multipart.map_err(|e| {
        debug!(error = %e, "Request is not a multipart upload");
        reject(NO_VIDEO, "not_multipart")
    })?;

    let limit_label = state.config.max_upload_label();
    let mut form = AnalyzeForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::from_multipart(e, &limit_label))?
    {
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            "video" => {
                // Only the first named file counts
                if form.upload.is_some() {
                    continue;
                }
                let Some(file_name) = field.file_name().map(str::to_string) else {
                    continue;
                };
                if file_name.is_empty() {
                    form.saw_empty_filename = true;
                    continue;
                }
                if !is_allowed_video_filename(&file_name) {
                    return Err(reject(UNSUPPORTED_FORMAT, "extension"));
                }

                let mut upload = ScratchUpload::create(&state.config.upload_dir, &file_name);
                let bytes = upload.write_field(field, &limit_label).await?;
                metrics::record_upload_bytes(bytes);
                debug!(file = %file_name, bytes, "Stored upload");
                form.upload = Some(upload);
            }
            "stroke_type" => form.stroke_type = Some(read_text(field, &limit_label).await?),
            "name" => form.student.name = Some(read_text(field, &limit_label).await?),
            "age" => form.student.age = Some(read_text(field, &limit_label).await?),
            "level" => form.student.level = Some(read_text(field, &limit_label).await?),
            "concerns" => form.student.concerns = Some(read_text(field, &limit_label).await?),
            _ => {}
        }
    }

    let Some(upload) = form.upload else {
        return Err(if form.saw_empty_filename {
            reject(NO_FILE_SELECTED, "empty_filename")
        } else {
            reject(NO_VIDEO, "missing")
        });
    };

    let stroke = form
        .stroke_type
        .as_deref()
        .map(StrokeType::from_tag)
        .unwrap_or_default();
    let student = StudentContext::from_form(form.student);

    info!(
        file = %upload.original_name(),
        bytes = upload.size(),
        stroke = stroke.as_str(),
        "Received video for analysis"
    );

    let result = state
        .pipeline
        .clone()
        .run_detached(upload.path().to_path_buf(), stroke, student)
        .await;

    // Scratch file goes away here
    drop(upload);

    let status = if result.success {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };

    Ok((status, Json(result)))
}

//! Handlers for upload, script generation and script download.

use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE, SET_COOKIE};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Form, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{generate_script, LayoutDescriptor, SCRIPT_FILE_NAME};

use super::config::ServerConfig;
use super::error::{AppError, AppResult, UploadRejection};
use super::session::Session;
use super::state::AppState;
use super::upload::{analyze_upload, is_allowed_filename};

/// Multipart field carrying the presentation.
const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize)]
pub struct LayoutsResponse {
    pub details: Option<Vec<LayoutDescriptor>>,
}

#[derive(Debug, Serialize)]
pub struct GeneratedResponse {
    pub details: Vec<LayoutDescriptor>,
    pub generated_code: String,
}

#[derive(Debug, Deserialize)]
pub struct GenerateForm {
    pub master_url: Option<String>,
    pub layout_data: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// GET /
///
/// Nothing has been analyzed yet, so there are no details to show.
pub async fn index() -> Json<LayoutsResponse> {
    Json(LayoutsResponse { details: None })
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// POST /
///
/// Accepts a `.pptx`/`.potx` upload in the `file` field and answers with its layout inventory.
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<LayoutsResponse>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, &state.config))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        if filename.is_empty() {
            return Err(UploadRejection::EmptyFilename.into());
        }
        if !is_allowed_filename(&filename) {
            return Err(UploadRejection::DisallowedExtension(filename).into());
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| multipart_error(e, &state.config))?;
        tracing::info!(filename = %filename, size = data.len(), "Analyzing upload");

        let upload_folder = state.config.upload_folder.clone();
        let layouts = tokio::task::spawn_blocking(move || analyze_upload(&upload_folder, &filename, &data))
            .await
            .map_err(|e| AppError::InternalError(format!("Analysis task failed: {e}")))??;

        tracing::info!(layouts = layouts.len(), "Upload analyzed");
        return Ok(Json(LayoutsResponse { details: Some(layouts) }));
    }

    Err(UploadRejection::MissingFile.into())
}

/// POST /generate_script
///
/// Renders the script for `master_url` and the round-tripped `layout_data`, and keeps it
/// as this session's download.
pub async fn generate(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<GenerateForm>,
) -> AppResult<Response> {
    let master_url = form
        .master_url
        .ok_or_else(|| AppError::BadRequest("master_url is required".into()))?;
    let layout_data = form
        .layout_data
        .ok_or_else(|| AppError::BadRequest("layout_data is required".into()))?;

    let layouts: Vec<LayoutDescriptor> = serde_json::from_str(&layout_data)
        .map_err(|e| AppError::BadRequest(format!("Invalid layout_data: {e}")))?;

    let generated_code = generate_script(&master_url, &layouts)
        .map_err(|e| AppError::InternalError(format!("Script generation failed: {e}")))?;

    let now = Utc::now();
    let expired = state.sessions.sweep(now, state.script_ttl());
    if expired > 0 {
        tracing::debug!(expired, "Dropped expired scripts");
    }
    state.sessions.store_script(&session.id, generated_code.clone(), now);
    tracing::info!(layouts = layouts.len(), "Generated script");

    let mut response = Json(GeneratedResponse {
        details: layouts,
        generated_code,
    })
    .into_response();

    if let Some(cookie) = session.set_cookie(&state.sessions) {
        response.headers_mut().insert(SET_COOKIE, cookie);
    }

    Ok(response)
}

/// GET /download_script
pub async fn download(State(state): State<AppState>, session: Session) -> AppResult<Response> {
    state.sessions.sweep(Utc::now(), state.script_ttl());

    if session.is_new {
        return Err(AppError::DownloadUnavailable);
    }

    let code = state
        .sessions
        .script(&session.id)
        .filter(|code| !code.is_empty())
        .ok_or(AppError::DownloadUnavailable)?;

    let headers = [
        (CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
        (CONTENT_DISPOSITION, format!("attachment;filename={SCRIPT_FILE_NAME}")),
    ];
    Ok((headers, code).into_response())
}

fn multipart_error(err: MultipartError, config: &ServerConfig) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        UploadRejection::TooLarge {
            max_mb: config.max_content_length_mb(),
        }
        .into()
    } else {
        AppError::BadRequest(err.body_text())
    }
}

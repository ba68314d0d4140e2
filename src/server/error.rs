use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Message returned for any failure whose details must not reach the client.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error. Please try again later.";

/// Why an upload was refused before any parsing happened.
#[derive(Debug, thiserror::Error)]
pub enum UploadRejection {
    #[error("No file selected")]
    MissingFile,

    #[error("No file selected")]
    EmptyFilename,

    #[error("Unsupported file type: {0}. Please upload a .pptx or .potx file")]
    DisallowedExtension(String),

    #[error("File is too large. Maximum is {max_mb}MB")]
    TooLarge { max_mb: usize },
}

/// Application-level error type for HTTP handlers.
///
/// Implements [`IntoResponse`] so handlers can return [`AppResult`] and use `?`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The upload was refused; answered with a plain message.
    #[error(transparent)]
    UploadRejected(#[from] UploadRejection),

    /// The container could not be analyzed.
    #[error(transparent)]
    Parse(#[from] crate::Error),

    /// No script has been generated in this session.
    #[error("No script available")]
    DownloadUnavailable,

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error; logged, never shown to the client.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::UploadRejected(rejection) => {
                let status = match rejection {
                    UploadRejection::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
                    _ => StatusCode::BAD_REQUEST,
                };
                tracing::info!(reason = %rejection, "Upload rejected");
                (status, rejection.to_string()).into_response()
            }
            AppError::Parse(err) => {
                tracing::error!(error = %err, kind = err.kind(), "Failed to analyze presentation");
                let message = err.to_string();
                let body = json!({
                    "error": message,
                    "status": "error",
                    "details": {
                        "type": err.kind(),
                        "message": message,
                    },
                });
                (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(body)).into_response()
            }
            AppError::DownloadUnavailable => {
                (StatusCode::NOT_FOUND, "No script available").into_response()
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn into_parts(err: AppError) -> (StatusCode, String) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn parse_error_is_structured_json() {
        let err = AppError::Parse(crate::Error::MissingPart("ppt/presentation.xml".into()));
        let (status, body) = into_parts(err).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["error"], "Part not found in container: ppt/presentation.xml");
        assert_eq!(json["details"]["type"], "MissingPart");
        assert_eq!(json["details"]["message"], json["error"]);
    }

    #[tokio::test]
    async fn oversize_upload_returns_413() {
        let (status, body) = into_parts(UploadRejection::TooLarge { max_mb: 64 }.into()).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body, "File is too large. Maximum is 64MB");
    }

    #[tokio::test]
    async fn missing_download_returns_404() {
        let (status, body) = into_parts(AppError::DownloadUnavailable).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "No script available");
    }

    #[tokio::test]
    async fn internal_error_hides_details() {
        let (status, body) = into_parts(AppError::InternalError("disk exploded at /srv".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, INTERNAL_ERROR_MESSAGE);
    }
}

//! Error types for the coin catalog API

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use coin_types::GuardError;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Submission over the document size ceiling; the message carries the
    /// measured size
    #[error("{0}")]
    DocumentTooLarge(String),

    #[error("A coin with Coin No {0} already exists.")]
    DuplicateCoinNo(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Image processing failed: {0}")]
    Image(#[from] coin_intake::IntakeError),

    #[error("Failed to add coin.")]
    SubmissionFailed(#[source] sqlx::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Report export failed: {0}")]
    Report(#[from] coin_report::ReportError),

    #[error("Worker task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidRequest(rejection.body_text())
    }
}

impl From<GuardError> for ApiError {
    fn from(err: GuardError) -> Self {
        match err {
            GuardError::DocumentTooLarge { .. } => ApiError::DocumentTooLarge(err.to_string()),
            GuardError::MissingFields(_) | GuardError::TooManyPhotos(_) => {
                ApiError::InvalidRequest(err.to_string())
            }
            GuardError::Serialization(e) => ApiError::InvalidRequest(e.to_string()),
        }
    }
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
    code: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::DocumentTooLarge(msg) => {
                (StatusCode::PAYLOAD_TOO_LARGE, "DOCUMENT_TOO_LARGE", msg.clone())
            }
            ApiError::DuplicateCoinNo(_) => {
                (StatusCode::CONFLICT, "DUPLICATE_COIN_NO", self.to_string())
            }
            ApiError::InvalidRequest(msg) => {
                (StatusCode::BAD_REQUEST, "INVALID_REQUEST", msg.clone())
            }
            ApiError::Image(e) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "INVALID_IMAGE",
                e.to_string(),
            ),
            ApiError::SubmissionFailed(e) => {
                tracing::error!("Error adding coin: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "SUBMISSION_FAILED",
                    self.to_string(),
                )
            }
            ApiError::Database(e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "Database error".to_string(),
                )
            }
            ApiError::Report(e) => {
                tracing::error!("Report export failed: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "REPORT_FAILED",
                    "Report export failed".to_string(),
                )
            }
            ApiError::Task(e) => {
                tracing::error!("Worker task failed: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Internal server error".to_string(),
                )
            }
        };

        let body = ErrorResponse {
            success: false,
            error: message,
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

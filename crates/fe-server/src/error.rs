//! HTTP-facing error type
//!
//! Storage and ingestion errors map onto status codes here; anything
//! classified as internal is logged in full and reported to the client
//! as a generic message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use fe_srm::SrmError;

use crate::api::response::ErrorResponse;
use crate::ingest::IngestError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("ingestion unavailable")]
    Unavailable,

    #[error(transparent)]
    Storage(SrmError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            AppError::Unavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                "UNAVAILABLE",
                "Ingestion is unavailable, try again later".to_string(),
            ),
            AppError::Storage(err) => {
                tracing::error!("Storage error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "A storage error occurred".to_string(),
                )
            },
        };

        let body = ErrorResponse::new(code, message);
        (status, Json(body)).into_response()
    }
}

impl From<SrmError> for AppError {
    fn from(err: SrmError) -> Self {
        match err {
            SrmError::NotFound => AppError::NotFound("Record not found".to_string()),
            other => AppError::Storage(other),
        }
    }
}

impl From<IngestError> for AppError {
    fn from(err: IngestError) -> Self {
        match err {
            IngestError::InvalidTarget(target) => {
                AppError::BadRequest(format!("Ingestion target {target} not valid"))
            },
            IngestError::QueueClosed => AppError::Unavailable,
            IngestError::Storage(err) => err.into(),
            other => {
                tracing::error!("Ingestion error: {}", other);
                AppError::BadRequest(other.to_string())
            },
        }
    }
}

/// Alias for handler results.
pub type ApiResult<T> = Result<T, AppError>;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use sqlsolver::{ingest::IngestCsvError, PromptError};
use tracing::error;

/// A custom error type for the server application.
///
/// This enum encapsulates different kinds of errors that can occur within the server,
/// allowing them to be converted into appropriate HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Errors originating from the `sqlsolver` library.
    Prompt(PromptError),
    /// The submitted form could not be read.
    BadRequest(String),
    /// Generic internal server errors.
    Internal(anyhow::Error),
}

/// Conversion from `PromptError` to `AppError`.
impl From<PromptError> for AppError {
    fn from(err: PromptError) -> Self {
        AppError::Prompt(err)
    }
}

/// Conversion from `anyhow::Error` to `AppError`.
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status_code, error_message) = match self {
            AppError::Prompt(err) => {
                // Log the original error for debugging purposes
                error!("PromptError: {:?}", err);
                match err {
                    PromptError::Ingest(
                        IngestCsvError::Parse(_)
                        | IngestCsvError::NoData
                        | IngestCsvError::TooManyFields { .. },
                    ) => (
                        StatusCode::BAD_REQUEST,
                        format!("Failed to load CSV: {err}"),
                    ),
                    PromptError::Ingest(_) => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        format!("Failed to store CSV: {err}"),
                    ),
                    PromptError::MissingAiProvider | PromptError::MissingStorageProvider => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Server is not configured correctly.".to_string(),
                    ),
                    PromptError::AiRequest(_)
                    | PromptError::AiDeserialization(_)
                    | PromptError::AiApi { .. }
                    | PromptError::EmptyCompletion => (
                        StatusCode::BAD_GATEWAY,
                        format!("AI provider error: {err}"),
                    ),
                    PromptError::StorageConnection(_) | PromptError::StorageOperationFailed(_) => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        format!("Storage error: {err}"),
                    ),
                    PromptError::JsonSerialization(_) | PromptError::ReqwestClientBuild(_) => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        format!("Internal error: {err}"),
                    ),
                }
            }
            AppError::BadRequest(message) => {
                error!("Bad request: {message}");
                (StatusCode::BAD_REQUEST, message)
            }
            AppError::Internal(err) => {
                error!("Internal server error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred.".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status_code, body).into_response()
    }
}

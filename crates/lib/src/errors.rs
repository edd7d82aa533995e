use crate::ingest::IngestCsvError;
use thiserror::Error;

/// Custom error types for the application.
#[derive(Error, Debug)]
pub enum PromptError {
    #[error("Failed to build Reqwest client: {0}")]
    ReqwestClientBuild(reqwest::Error),
    #[error("Connection error: {0}")]
    AiRequest(reqwest::Error),
    #[error("Failed to deserialize AI provider response: {0}")]
    AiDeserialization(reqwest::Error),
    #[error("Error code: {status} - {body}")]
    AiApi { status: u16, body: String },
    #[error("The AI provider returned no message content")]
    EmptyCompletion,
    #[error("AI provider is missing")]
    MissingAiProvider,
    #[error("Storage provider is missing")]
    MissingStorageProvider,
    #[error("Storage connection error: {0}")]
    StorageConnection(String),
    #[error("Storage operation failed: {0}")]
    StorageOperationFailed(String),
    #[error(transparent)]
    Ingest(#[from] IngestCsvError),
    #[error("JSON serialization error: {0}")]
    JsonSerialization(#[from] serde_json::Error),
}

impl PromptError {
    /// Returns `true` for failures raised by the hosted model's API itself:
    /// transport errors, non-success status codes, and unreadable responses.
    pub fn is_api_error(&self) -> bool {
        matches!(
            self,
            PromptError::AiRequest(_) | PromptError::AiDeserialization(_) | PromptError::AiApi { .. }
        )
    }
}

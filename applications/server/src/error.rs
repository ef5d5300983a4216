/// Service error types
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use mdreader_core::{Diagnostic, ErrorKind};
use mdreader_tags::AssemblyError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServiceError>;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    #[error(transparent)]
    Assembly(#[from] AssemblyError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::UnknownCommand(_) => ErrorKind::UnknownCommand,
            ServiceError::InvalidParams(_) => ErrorKind::InvalidParams,
            ServiceError::Assembly(e) => e.kind(),
            ServiceError::Config(_) | ServiceError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// `{"error": {"kind", "message"}}` body for this error
    pub fn envelope(&self) -> ErrorEnvelope {
        ErrorEnvelope {
            error: Diagnostic::new(self.kind(), self.to_string()),
        }
    }

    fn status(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::UnknownCommand | ErrorKind::InvalidParams => StatusCode::BAD_REQUEST,
            ErrorKind::DirectoryNotFound => StatusCode::NOT_FOUND,
            ErrorKind::NoAudioFiles | ErrorKind::NoUsableMetadata => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: Diagnostic,
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(kind = %self.kind(), "request failed: {}", self);
        }
        (status, Json(self.envelope())).into_response()
    }
}

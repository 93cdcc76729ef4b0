use axum::{http::StatusCode, response::Json};
use tracing::{error, warn};

use crate::backend::BackendError;
use crate::models::ErrorBody;
use crate::validator::ModelOutputError;

/// Centralized error types for the flashcard endpoint
#[derive(Debug, thiserror::Error)]
pub enum FlashcardError {
    #[error("Missing fact")]
    MissingFact,

    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("Backend request timed out")]
    BackendTimeout,

    #[error("Backend returned status {status}: {body}")]
    BackendStatus { status: u16, body: String },

    #[error("Empty response from model")]
    EmptyModelOutput,

    #[error("Invalid JSON from model: {message}")]
    MalformedModelOutput { message: String, raw: String },

    #[error("Invalid flashcard from model: {0}")]
    SchemaViolation(String),
}

impl From<BackendError> for FlashcardError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Timeout(_) => FlashcardError::BackendTimeout,
            BackendError::Status { status, body } => FlashcardError::BackendStatus { status, body },
            BackendError::Decode { message, body } => {
                FlashcardError::MalformedModelOutput { message, raw: body }
            }
            other @ (BackendError::Network(_) | BackendError::ServerError(_)) => {
                FlashcardError::BackendUnavailable(other.to_string())
            }
        }
    }
}

impl From<ModelOutputError> for FlashcardError {
    fn from(err: ModelOutputError) -> Self {
        match err {
            ModelOutputError::Malformed { message, raw } => {
                FlashcardError::MalformedModelOutput { message, raw }
            }
            ModelOutputError::SchemaViolation(detail) => FlashcardError::SchemaViolation(detail),
        }
    }
}

/// Error context for structured logging
#[derive(Debug)]
pub struct ErrorContext {
    pub operation: String,
    pub request_id: Option<String>,
}

impl ErrorContext {
    pub fn new(operation: &str) -> Self {
        Self {
            operation: operation.to_string(),
            request_id: None,
        }
    }

    pub fn with_request_id(mut self, request_id: impl ToString) -> Self {
        self.request_id = Some(request_id.to_string());
        self
    }
}

impl FlashcardError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            FlashcardError::MissingFact => StatusCode::BAD_REQUEST,
            FlashcardError::BackendUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
            FlashcardError::BackendTimeout => StatusCode::GATEWAY_TIMEOUT,
            FlashcardError::BackendStatus { .. } => StatusCode::BAD_GATEWAY,
            FlashcardError::EmptyModelOutput => StatusCode::BAD_GATEWAY,
            FlashcardError::MalformedModelOutput { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            FlashcardError::SchemaViolation(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Convert to an HTTP response with consistent structure and logging
    pub fn to_response_with_context(self, context: ErrorContext) -> (StatusCode, Json<ErrorBody>) {
        let status = self.status_code();

        let body = match &self {
            FlashcardError::MissingFact => {
                warn!(
                    operation = %context.operation,
                    request_id = ?context.request_id,
                    error = %self,
                    "Client input error"
                );
                ErrorBody::new("Missing fact")
            }
            FlashcardError::BackendUnavailable(message) => {
                error!(
                    operation = %context.operation,
                    request_id = ?context.request_id,
                    error = %self,
                    "Backend unavailable"
                );
                ErrorBody::new("Internal server error").with_details(message.clone())
            }
            FlashcardError::BackendTimeout => {
                error!(
                    operation = %context.operation,
                    request_id = ?context.request_id,
                    error = %self,
                    "Backend timeout"
                );
                ErrorBody::new("Request timed out")
            }
            FlashcardError::BackendStatus { status: backend_status, body } => {
                error!(
                    operation = %context.operation,
                    request_id = ?context.request_id,
                    backend_status = backend_status,
                    error = %self,
                    "Backend request failed"
                );
                ErrorBody::new("Ollama request failed").with_details(body.clone())
            }
            FlashcardError::EmptyModelOutput => {
                error!(
                    operation = %context.operation,
                    request_id = ?context.request_id,
                    error = %self,
                    "Model returned no text"
                );
                ErrorBody::new("Empty response from model")
            }
            FlashcardError::MalformedModelOutput { message, raw } => {
                error!(
                    operation = %context.operation,
                    request_id = ?context.request_id,
                    error = %self,
                    raw_output = %raw,
                    "Model output is not valid JSON"
                );
                ErrorBody::new("Invalid JSON from model").with_raw(message.clone())
            }
            FlashcardError::SchemaViolation(detail) => {
                error!(
                    operation = %context.operation,
                    request_id = ?context.request_id,
                    error = %self,
                    "Model output has the wrong shape"
                );
                ErrorBody::new("Invalid flashcard from model").with_details(detail.clone())
            }
        };

        (status, Json(body))
    }
}

use axum::{ http::StatusCode, response::{ IntoResponse, Response }, Json };
use thiserror::Error;

use crate::llm::LlmError;
use crate::models::chat::ErrorResponse;

pub const MESSAGES_NOT_ARRAY: &str = "Messages must be an array";
pub const EMPTY_MESSAGE: &str =
    "Each message must have a non-empty message or content property.";

/// Failures a relay handler reports back to its caller as `{"error": ...}`.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Upstream(String),
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::BadRequest(_) => StatusCode::BAD_REQUEST,
            RelayError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<LlmError> for RelayError {
    fn from(err: LlmError) -> Self {
        RelayError::Upstream(err.to_string())
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(ErrorResponse { error: self.to_string() })).into_response()
    }
}

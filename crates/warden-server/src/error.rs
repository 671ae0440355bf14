//! API error types.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

use warden_core::ClassifyError;

/// API errors.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed request or unusable artifact.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// No provider could answer and the chain does not fall back.
    #[error("{0}")]
    ServiceUnavailable(String),
}

impl From<ClassifyError> for ApiError {
    fn from(err: ClassifyError) -> Self {
        match err {
            ClassifyError::InvalidInput(msg) => ApiError::BadRequest(msg),
            e @ ClassifyError::ServiceUnavailable { .. } => {
                ApiError::ServiceUnavailable(e.to_string())
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            ApiError::ServiceUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "service_unavailable")
            }
        };

        let body = ErrorResponse {
            error: self.to_string(),
            code: code.to_string(),
        };

        (status, axum::Json(body)).into_response()
    }
}

/// Result type for API operations.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use warden_core::ArtifactKind;

    #[test]
    fn invalid_input_is_bad_request() {
        let err: ApiError = ClassifyError::InvalidInput("text must not be empty".into()).into();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn unavailable_keeps_chain_message() {
        let err: ApiError = ClassifyError::ServiceUnavailable {
            kind: ArtifactKind::Text,
            reason: "llm-text: timeout".into(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "text classification service unavailable: llm-text: timeout"
        );
        assert_eq!(err.into_response().status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}

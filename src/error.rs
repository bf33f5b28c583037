//! Application error type
//!
//! Every failing endpoint reports its error in the response body as
//! `{"error": <message>}` with HTTP 200 — the frontend reads the body,
//! not the status line. Errors are logged once, at the response boundary.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Missing credentials or model identifiers. Raised synchronously,
    /// before any network call, at first use of the component needing them.
    #[error("{0}")]
    Config(String),

    /// A vendor API call failed or returned a malformed response.
    #[error("{0}")]
    Vendor(String),

    /// The caller supplied the wrong shape of payload.
    #[error("{0}")]
    InvalidInput(String),

    /// Local filesystem failure while reading or persisting generated images.
    #[error("{0}")]
    Storage(String),
}

impl AppError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Vendor(_) => "vendor",
            Self::InvalidInput(_) => "invalid_input",
            Self::Storage(_) => "storage",
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        Self::Vendor(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(kind = self.kind(), error = %self, "request failed");
        (StatusCode::OK, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_bare_message() {
        let err = AppError::InvalidInput("prompt 필드는 문자열로 반드시 포함되어야 합니다.".to_string());
        assert_eq!(
            err.to_string(),
            "prompt 필드는 문자열로 반드시 포함되어야 합니다."
        );
    }

    #[test]
    fn test_kind_labels() {
        assert_eq!(AppError::Config("x".into()).kind(), "config");
        assert_eq!(AppError::Vendor("x".into()).kind(), "vendor");
    }
}

//! Request-level errors and their HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Why a webhook request was rejected. Every variant is the caller's fault and maps to 400.
#[derive(Debug, thiserror::Error)]
pub enum NotifierError {
    /// Destination missing or ambiguous.
    #[error("{0}")]
    Configuration(String),

    /// Body missing, not an object, or not a build notification.
    #[error("{0}")]
    Validation(String),

    /// A double-encoded body that failed its second parse.
    #[error("invalid JSON body: {0}")]
    Parse(#[from] serde_json::Error),
}

impl NotifierError {
    /// Short label used for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            NotifierError::Configuration(_) => "configuration",
            NotifierError::Validation(_) => "validation",
            NotifierError::Parse(_) => "parse",
        }
    }
}

impl IntoResponse for NotifierError {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, self.to_string()).into_response()
    }
}

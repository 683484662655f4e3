use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::analysis::analyzer::AnalysisError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
/// Every variant renders as the `{ "error": <message> }` envelope.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    /// `public_message` is all the caller sees; `source` is only logged.
    #[error("{public_message}: {source}")]
    Upstream {
        public_message: &'static str,
        #[source]
        source: AnalysisError,
    },
}

impl AppError {
    /// Logs the full failure where it happens, inside the handler's request
    /// span, and keeps only `public_message` for the response.
    pub fn upstream(public_message: &'static str) -> impl FnOnce(AnalysisError) -> Self {
        move |source| {
            tracing::error!("{public_message}: {source}");
            AppError::Upstream {
                public_message,
                source,
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                "Method not allowed".to_string(),
            ),
            AppError::Upstream { public_message, .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, public_message.to_string())
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::analysis::handlers;
use crate::errors::AppError;
use crate::state::AppState;

async fn not_found() -> AppError {
    AppError::NotFound("No such endpoint".to_string())
}

async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/health",
            get(health::health_handler).fallback(method_not_allowed),
        )
        .route(
            "/api/ai/file-encryption",
            post(handlers::handle_file_encryption).fallback(method_not_allowed),
        )
        .route(
            "/api/ai/threat-analysis",
            post(handlers::handle_threat_analysis).fallback(method_not_allowed),
        )
        .route(
            "/api/ai/threat-safety",
            post(handlers::handle_threat_safety).fallback(method_not_allowed),
        )
        .fallback(not_found)
        .with_state(state)
}

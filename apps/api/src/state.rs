use std::sync::Arc;

use crate::analysis::analyzer::ThreatAnalyzer;

/// Shared application state injected into all route handlers via Axum extractors.
/// Immutable after startup; handlers share nothing else.
#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<ThreatAnalyzer>,
    /// Model identifier reported by the health endpoint.
    pub model: String,
}

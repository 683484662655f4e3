//! Axum route handlers for the AI analysis API.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::analysis::schemas::{FileEncryptionAssessment, ThreatSafetyAssessment};
use crate::errors::AppError;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

// Fields are optional on the wire so an absent field reaches validation as
// "missing" rather than failing JSON decoding.

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FileEncryptionRequest {
    pub file_data: Option<String>,
    pub file_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ThreatAnalysisRequest {
    pub threat_description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ThreatSafetyRequest {
    pub threat_data: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEncryptionResponse {
    pub success: bool,
    pub encryption_analysis: FileEncryptionAssessment,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreatAnalysisResponse {
    pub success: bool,
    pub detailed_analysis: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ThreatSafetyResponse {
    pub success: bool,
    pub analysis: ThreatSafetyAssessment,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/ai/file-encryption
#[tracing::instrument(name = "file_encryption", skip_all, fields(request_id = %Uuid::new_v4()))]
pub async fn handle_file_encryption(
    State(state): State<AppState>,
    payload: Result<Json<FileEncryptionRequest>, JsonRejection>,
) -> Result<Json<FileEncryptionResponse>, AppError> {
    let Json(request) = payload.map_err(reject_body)?;
    // File content is opaque; only the name is checked for blank text.
    let (Some(file_data), Some(file_name)) = (
        request.file_data.as_deref().filter(|d| !d.is_empty()),
        present(&request.file_name),
    ) else {
        return Err(AppError::Validation(
            "File data and name are required".to_string(),
        ));
    };

    let encryption_analysis = state
        .analyzer
        .detect_file_encryption(file_data, file_name)
        .await
        .map_err(AppError::upstream("Failed to detect file encryption"))?;

    Ok(Json(FileEncryptionResponse {
        success: true,
        encryption_analysis,
    }))
}

/// POST /api/ai/threat-analysis
#[tracing::instrument(name = "threat_analysis", skip_all, fields(request_id = %Uuid::new_v4()))]
pub async fn handle_threat_analysis(
    State(state): State<AppState>,
    payload: Result<Json<ThreatAnalysisRequest>, JsonRejection>,
) -> Result<Json<ThreatAnalysisResponse>, AppError> {
    let Json(request) = payload.map_err(reject_body)?;
    let threat_description = present(&request.threat_description).ok_or_else(|| {
        AppError::Validation("Threat description is required".to_string())
    })?;

    let detailed_analysis = state
        .analyzer
        .get_detailed_threat_analysis(threat_description)
        .await
        .map_err(AppError::upstream("Failed to generate threat analysis"))?;

    Ok(Json(ThreatAnalysisResponse {
        success: true,
        detailed_analysis,
    }))
}

/// POST /api/ai/threat-safety
#[tracing::instrument(name = "threat_safety", skip_all, fields(request_id = %Uuid::new_v4()))]
pub async fn handle_threat_safety(
    State(state): State<AppState>,
    payload: Result<Json<ThreatSafetyRequest>, JsonRejection>,
) -> Result<Json<ThreatSafetyResponse>, AppError> {
    let Json(request) = payload.map_err(reject_body)?;
    let threat_data = present(&request.threat_data)
        .ok_or_else(|| AppError::Validation("Threat data is required".to_string()))?;

    let analysis = state
        .analyzer
        .analyze_threat_safety(threat_data)
        .await
        .map_err(AppError::upstream("Failed to analyze threat safety"))?;

    Ok(Json(ThreatSafetyResponse {
        success: true,
        analysis,
    }))
}

/// A field counts as present only when it holds non-blank text.
fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|v| !v.trim().is_empty())
}

fn reject_body(rejection: JsonRejection) -> AppError {
    debug!("Rejected request body: {rejection}");
    AppError::Validation("Invalid JSON body".to_string())
}

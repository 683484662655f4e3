//! ThreatScope dashboard panels, the consumer side of the analysis endpoints.
//!
//! Each panel owns its form input, one of three request states (idle, loading,
//! error) and the last successful result. A submit is split into `begin`
//! (validate + enter Loading) and `complete` (apply the outcome) so the
//! rendering layer can observe the Loading state between the two.
//!
//! A failed request keeps the previous result on screen.

pub mod client;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::warn;

use threatscope_api::analysis::leading_sample;
use threatscope_api::analysis::schemas::{
    EncryptionStrength, FileEncryptionAssessment, ThreatSafetyAssessment,
};

use crate::client::{ApiClient, ClientError};

/// Characters of file content the file panel uploads.
pub const UPLOAD_SAMPLE_CHARS: usize = 1000;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PanelStatus {
    #[default]
    Idle,
    Loading,
    Error(String),
}

#[derive(Debug, Clone)]
pub struct Panel<T> {
    status: PanelStatus,
    result: Option<T>,
}

impl<T> Default for Panel<T> {
    fn default() -> Self {
        Self {
            status: PanelStatus::Idle,
            result: None,
        }
    }
}

impl<T> Panel<T> {
    pub fn status(&self) -> &PanelStatus {
        &self.status
    }

    pub fn result(&self) -> Option<&T> {
        self.result.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.status == PanelStatus::Loading
    }

    fn fail(&mut self, message: &str) {
        self.status = PanelStatus::Error(message.to_string());
    }

    /// A rejected request (non-2xx) shows `rejected_message`; transport
    /// failures show their own description.
    fn finish(&mut self, outcome: Result<T, ClientError>, rejected_message: &str) {
        match outcome {
            Ok(result) => {
                self.result = Some(result);
                self.status = PanelStatus::Idle;
            }
            Err(ClientError::Status { status, message }) => {
                warn!("Analysis request rejected ({status}): {message}");
                self.fail(rejected_message);
            }
            Err(e) => {
                warn!("Analysis request failed: {e}");
                self.status = PanelStatus::Error(e.to_string());
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Threat safety panel
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct ThreatPanel {
    input: String,
    panel: Panel<ThreatSafetyAssessment>,
}

impl ThreatPanel {
    pub fn set_input(&mut self, input: &str) {
        self.input = input.to_string();
    }

    pub fn panel(&self) -> &Panel<ThreatSafetyAssessment> {
        &self.panel
    }

    /// Returns the text to send, or `None` when nothing should be sent.
    pub fn begin(&mut self) -> Option<String> {
        if self.panel.is_loading() {
            return None;
        }
        if self.input.trim().is_empty() {
            self.panel.fail("Please enter threat data");
            return None;
        }
        self.panel.status = PanelStatus::Loading;
        Some(self.input.clone())
    }

    pub fn complete(&mut self, outcome: Result<ThreatSafetyAssessment, ClientError>) {
        self.panel.finish(outcome, "Failed to analyze threat");
    }

    pub async fn submit(&mut self, client: &ApiClient) {
        if let Some(threat_data) = self.begin() {
            let outcome = client.threat_safety(&threat_data).await;
            self.complete(outcome);
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// File encryption panel
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct FilePanel {
    file_name: String,
    file_data: String,
    panel: Panel<FileEncryptionAssessment>,
}

impl FilePanel {
    /// UTF-8 content is kept as text; anything else becomes a base64 data URL.
    pub fn load_file(&mut self, name: &str, bytes: &[u8]) {
        self.file_name = name.to_string();
        self.file_data = match std::str::from_utf8(bytes) {
            Ok(text) => text.to_string(),
            Err(_) => {
                // Only the upload sample survives, so encode no more than that.
                let head = &bytes[..bytes.len().min(UPLOAD_SAMPLE_CHARS)];
                format!("data:application/octet-stream;base64,{}", STANDARD.encode(head))
            }
        };
    }

    pub fn file_data(&self) -> &str {
        &self.file_data
    }

    pub fn panel(&self) -> &Panel<FileEncryptionAssessment> {
        &self.panel
    }

    /// Returns `(file_data_sample, file_name)` to send, or `None`.
    pub fn begin(&mut self) -> Option<(String, String)> {
        if self.panel.is_loading() {
            return None;
        }
        if self.file_data.is_empty() || self.file_name.is_empty() {
            self.panel.fail("Please select a file");
            return None;
        }
        self.panel.status = PanelStatus::Loading;
        Some((
            leading_sample(&self.file_data, UPLOAD_SAMPLE_CHARS).to_string(),
            self.file_name.clone(),
        ))
    }

    pub fn complete(&mut self, outcome: Result<FileEncryptionAssessment, ClientError>) {
        self.panel.finish(outcome, "Failed to check encryption");
    }

    pub async fn submit(&mut self, client: &ApiClient) {
        if let Some((file_data, file_name)) = self.begin() {
            let outcome = client.file_encryption(&file_data, &file_name).await;
            self.complete(outcome);
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Display helpers
// ────────────────────────────────────────────────────────────────────────────

/// Semantic colour for a value; the presentation layer maps it to a style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Positive,
    Caution,
    Warning,
    Neutral,
}

pub fn strength_tone(strength: EncryptionStrength) -> Tone {
    match strength {
        EncryptionStrength::Strong => Tone::Positive,
        EncryptionStrength::Moderate => Tone::Caution,
        EncryptionStrength::Weak => Tone::Warning,
        EncryptionStrength::Unknown => Tone::Neutral,
    }
}

pub fn verdict(assessment: &ThreatSafetyAssessment) -> &'static str {
    if assessment.is_safe {
        "This threat appears to be safe based on AI analysis."
    } else {
        "This threat is potentially dangerous. Exercise caution."
    }
}

/// Confidence as a whole percentage, e.g. 0.856 -> 86.
pub fn confidence_percent(assessment: &ThreatSafetyAssessment) -> u32 {
    (assessment.confidence * 100.0).round() as u32
}

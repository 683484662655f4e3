//! The three analysis operations. Each is exactly one provider call: build the
//! prompt, ask for output, validate structured output against its contract.
//! No retries and no partial results.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::analysis::leading_sample;
use crate::analysis::prompts::{
    fill_template, DETAILED_ANALYSIS_PROMPT, FILE_ENCRYPTION_PROMPT, THREAT_SAFETY_PROMPT,
};
use crate::analysis::schemas::{
    file_encryption_contract, threat_safety_contract, ContractError, FileEncryptionAssessment,
    StructuredContract, ThreatSafetyAssessment,
};
use crate::llm_client::{LlmError, Provider};

/// Characters of file content the model is shown.
pub const FILE_SAMPLE_CHARS: usize = 500;
/// Output token ceiling for the free-form report.
pub const DETAILED_ANALYSIS_MAX_TOKENS: u32 = 1000;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("{operation} received empty input")]
    EmptyInput { operation: &'static str },

    #[error("{operation}: provider call failed: {source}")]
    Upstream {
        operation: &'static str,
        #[source]
        source: LlmError,
    },

    #[error("{operation}: provider output rejected: {source}")]
    Contract {
        operation: &'static str,
        #[source]
        source: ContractError,
    },
}

pub struct ThreatAnalyzer {
    provider: Arc<dyn Provider>,
    threat_safety: StructuredContract,
    file_encryption: StructuredContract,
}

impl ThreatAnalyzer {
    /// Compiles both contracts up front so a broken schema fails at startup.
    pub fn new(provider: Arc<dyn Provider>) -> Result<Self, ContractError> {
        Ok(Self {
            provider,
            threat_safety: threat_safety_contract()?,
            file_encryption: file_encryption_contract()?,
        })
    }

    /// Judges whether the described threat is genuinely dangerous.
    pub async fn analyze_threat_safety(
        &self,
        threat_data: &str,
    ) -> Result<ThreatSafetyAssessment, AnalysisError> {
        const OPERATION: &str = "threat safety analysis";
        require_input(OPERATION, threat_data)?;

        let prompt = fill_template(THREAT_SAFETY_PROMPT, &[("threat_data", threat_data)]);
        debug!(input_chars = threat_data.chars().count(), "requesting threat safety assessment");
        self.generate_structured(OPERATION, &prompt, &self.threat_safety)
            .await
    }

    /// Assesses a leading sample of a file for encryption. Only the first
    /// `FILE_SAMPLE_CHARS` characters of `file_data` are sent. File content is
    /// opaque: whitespace-only data is still a sample.
    pub async fn detect_file_encryption(
        &self,
        file_data: &str,
        file_name: &str,
    ) -> Result<FileEncryptionAssessment, AnalysisError> {
        const OPERATION: &str = "file encryption detection";
        if file_data.is_empty() {
            return Err(AnalysisError::EmptyInput { operation: OPERATION });
        }
        require_input(OPERATION, file_name)?;

        let sample = leading_sample(file_data, FILE_SAMPLE_CHARS);
        let prompt = fill_template(
            FILE_ENCRYPTION_PROMPT,
            &[("file_name", file_name), ("file_sample", sample)],
        );
        debug!(
            received_chars = file_data.chars().count(),
            sample_chars = sample.chars().count(),
            "requesting file encryption assessment"
        );
        self.generate_structured(OPERATION, &prompt, &self.file_encryption)
            .await
    }

    /// Free-form report. The text is returned as the provider wrote it.
    pub async fn get_detailed_threat_analysis(
        &self,
        threat_description: &str,
    ) -> Result<String, AnalysisError> {
        const OPERATION: &str = "detailed threat analysis";
        require_input(OPERATION, threat_description)?;

        let prompt = fill_template(
            DETAILED_ANALYSIS_PROMPT,
            &[("threat_description", threat_description)],
        );
        self.provider
            .generate_text(&prompt, DETAILED_ANALYSIS_MAX_TOKENS)
            .await
            .map_err(|source| AnalysisError::Upstream {
                operation: OPERATION,
                source,
            })
    }

    async fn generate_structured<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        prompt: &str,
        contract: &StructuredContract,
    ) -> Result<T, AnalysisError> {
        debug!(contract = contract.name(), "forcing structured output");
        let raw = self
            .provider
            .generate_object(prompt, contract.tool())
            .await
            .map_err(|source| AnalysisError::Upstream { operation, source })?;

        contract
            .parse(raw)
            .map_err(|source| AnalysisError::Contract { operation, source })
    }
}

fn require_input(operation: &'static str, value: &str) -> Result<(), AnalysisError> {
    if value.trim().is_empty() {
        return Err(AnalysisError::EmptyInput { operation });
    }
    Ok(())
}

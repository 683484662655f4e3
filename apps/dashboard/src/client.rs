//! Typed HTTP client for the analysis endpoints, as used by the dashboard panels.

use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::{json, Value};
use thiserror::Error;

use threatscope_api::analysis::handlers::{
    FileEncryptionResponse, ThreatAnalysisResponse, ThreatSafetyResponse,
};
use threatscope_api::analysis::schemas::{FileEncryptionAssessment, ThreatSafetyAssessment};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("request failed (status {status}): {message}")]
    Status { status: u16, message: String },
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: String,
}

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn threat_safety(
        &self,
        threat_data: &str,
    ) -> Result<ThreatSafetyAssessment, ClientError> {
        let response: ThreatSafetyResponse = self
            .post("/api/ai/threat-safety", json!({ "threatData": threat_data }))
            .await?;
        Ok(response.analysis)
    }

    pub async fn file_encryption(
        &self,
        file_data: &str,
        file_name: &str,
    ) -> Result<FileEncryptionAssessment, ClientError> {
        let response: FileEncryptionResponse = self
            .post(
                "/api/ai/file-encryption",
                json!({ "fileData": file_data, "fileName": file_name }),
            )
            .await?;
        Ok(response.encryption_analysis)
    }

    pub async fn threat_analysis(&self, threat_description: &str) -> Result<String, ClientError> {
        let response: ThreatAnalysisResponse = self
            .post(
                "/api/ai/threat-analysis",
                json!({ "threatDescription": threat_description }),
            )
            .await?;
        Ok(response.detailed_analysis)
    }

    async fn post<T: DeserializeOwned>(&self, path: &str, body: Value) -> Result<T, ClientError> {
        let response = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorEnvelope>()
                .await
                .map(|e| e.error)
                .unwrap_or_else(|_| status.to_string());
            return Err(ClientError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use serde_json::json;
    use threatscope_api::analysis::analyzer::ThreatAnalyzer;
    use threatscope_api::analysis::schemas::EncryptionStrength;
    use threatscope_api::llm_client::{LlmError, Provider, ToolSpec};
    use threatscope_api::routes::build_router;
    use threatscope_api::state::AppState;

    use super::*;

    /// Provider that answers every call the same way.
    pub(crate) struct FixedProvider {
        reply: Result<Value, String>,
        calls: AtomicUsize,
    }

    impl FixedProvider {
        pub(crate) fn object(value: Value) -> Self {
            Self {
                reply: Ok(value),
                calls: AtomicUsize::new(0),
            }
        }

        /// Free-form replies are carried as a JSON string.
        pub(crate) fn text(text: &str) -> Self {
            Self::object(Value::String(text.to_string()))
        }

        pub(crate) fn failing(detail: &str) -> Self {
            Self {
                reply: Err(detail.to_string()),
                calls: AtomicUsize::new(0),
            }
        }

        pub(crate) fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn answer(&self) -> Result<Value, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply.clone().map_err(|message| LlmError::Api {
                status: 503,
                message,
            })
        }
    }

    #[async_trait]
    impl Provider for FixedProvider {
        async fn generate_object(
            &self,
            _prompt: &str,
            _tool: ToolSpec<'_>,
        ) -> Result<Value, LlmError> {
            self.answer()
        }

        async fn generate_text(&self, _prompt: &str, _max_tokens: u32) -> Result<String, LlmError> {
            match self.answer()? {
                Value::String(text) => Ok(text),
                _ => Err(LlmError::EmptyContent),
            }
        }
    }

    /// Serves the real router on an ephemeral port and returns a client for it.
    pub(crate) async fn serve(provider: Arc<FixedProvider>) -> ApiClient {
        let state = AppState {
            analyzer: Arc::new(ThreatAnalyzer::new(provider).unwrap()),
            model: "fixed-model".to_string(),
        };
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, build_router(state)).await.unwrap();
        });
        ApiClient::new(&format!("http://{addr}/"))
    }

    #[tokio::test]
    async fn test_threat_safety_round_trip() {
        let provider = Arc::new(FixedProvider::object(json!({
            "isSafe": true,
            "safetyScore": 77,
            "riskFactors": [],
            "recommendations": ["Monitor"],
            "confidence": 0.5
        })));
        let client = serve(provider.clone()).await;

        let analysis = client.threat_safety("newsletter link").await.unwrap();
        assert!(analysis.is_safe);
        assert_eq!(analysis.safety_score, 77.0);
        assert_eq!(analysis.recommendations, vec!["Monitor".to_string()]);
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_file_encryption_round_trip() {
        let provider = Arc::new(FixedProvider::object(json!({
            "isEncrypted": false,
            "encryptionType": null,
            "encryptionStrength": "weak",
            "securityRisks": [],
            "fileSignature": "%PDF",
            "recommendations": []
        })));
        let client = serve(provider).await;

        let analysis = client
            .file_encryption("%PDF-1.7", "report.pdf")
            .await
            .unwrap();
        assert_eq!(analysis.encryption_strength, EncryptionStrength::Weak);
    }

    #[tokio::test]
    async fn test_threat_analysis_round_trip() {
        let provider = Arc::new(FixedProvider::text("5) Detection methods: EDR telemetry."));
        let client = serve(provider).await;

        let report = client.threat_analysis("fileless malware").await.unwrap();
        assert!(report.contains("Detection methods"));
    }

    #[tokio::test]
    async fn test_error_envelope_becomes_status_error() {
        let provider = Arc::new(FixedProvider::text("unused"));
        let client = serve(provider.clone()).await;

        let err = client.threat_analysis("").await.unwrap_err();
        match err {
            ClientError::Status { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Threat description is required");
            }
            other => panic!("expected status error, got {other:?}"),
        }
        assert_eq!(provider.calls(), 0);
    }
}

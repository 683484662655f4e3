//! Structured-output contracts for the two schema-constrained analyses.
//!
//! Each contract is one JSON Schema document. The same document is sent to the
//! provider as the forced tool's `input_schema` and compiled locally to validate
//! whatever comes back. An object reaches a caller only after it passes the
//! compiled schema AND deserializes into the typed record.

use jsonschema::JSONSchema;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use crate::llm_client::ToolSpec;

// ────────────────────────────────────────────────────────────────────────────
// Typed records
// ────────────────────────────────────────────────────────────────────────────

/// Verdict on whether a reported threat is genuinely dangerous.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreatSafetyAssessment {
    pub is_safe: bool,
    pub safety_score: f64, // 0 – 100
    pub risk_factors: Vec<String>,
    pub recommendations: Vec<String>,
    pub confidence: f64, // 0.0 – 1.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncryptionStrength {
    Weak,
    Moderate,
    Strong,
    Unknown,
}

/// Assessment of a leading file sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEncryptionAssessment {
    pub is_encrypted: bool,
    pub encryption_type: Option<String>,
    pub encryption_strength: EncryptionStrength,
    pub security_risks: Vec<String>,
    pub file_signature: String,
    pub recommendations: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Contract
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ContractError {
    #[error("{contract} schema failed to compile: {message}")]
    Compile {
        contract: &'static str,
        message: String,
    },

    #[error("{contract} output violates schema: {}", .violations.join("; "))]
    Violation {
        contract: &'static str,
        violations: Vec<String>,
    },

    #[error("{contract} output could not be decoded: {source}")]
    Decode {
        contract: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// A named JSON Schema plus its compiled validator.
pub struct StructuredContract {
    name: &'static str,
    description: &'static str,
    schema: Value,
    validator: JSONSchema,
}

impl StructuredContract {
    pub fn new(
        name: &'static str,
        description: &'static str,
        schema: Value,
    ) -> Result<Self, ContractError> {
        let validator = JSONSchema::compile(&schema).map_err(|e| ContractError::Compile {
            contract: name,
            message: e.to_string(),
        })?;
        Ok(Self {
            name,
            description,
            schema,
            validator,
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    #[cfg(test)]
    pub fn schema(&self) -> &Value {
        &self.schema
    }

    /// The contract as a forced tool for the provider.
    pub fn tool(&self) -> ToolSpec<'_> {
        ToolSpec {
            name: self.name,
            description: self.description,
            input_schema: &self.schema,
        }
    }

    /// Validates `value` against the schema, then decodes it into `T`.
    pub fn parse<T: DeserializeOwned>(&self, value: Value) -> Result<T, ContractError> {
        if let Err(errors) = self.validator.validate(&value) {
            let violations = errors
                .map(|e| {
                    let path = e.instance_path.to_string();
                    if path.is_empty() {
                        e.to_string()
                    } else {
                        format!("{path}: {e}")
                    }
                })
                .collect();
            return Err(ContractError::Violation {
                contract: self.name,
                violations,
            });
        }

        serde_json::from_value(value).map_err(|source| ContractError::Decode {
            contract: self.name,
            source,
        })
    }
}

pub fn threat_safety_contract() -> Result<StructuredContract, ContractError> {
    StructuredContract::new(
        "threat_safety",
        "Record a safety assessment of a cybersecurity threat.",
        json!({
            "type": "object",
            "properties": {
                "isSafe": {
                    "type": "boolean",
                    "description": "Whether the threat is safe or not"
                },
                "safetyScore": {
                    "type": "number",
                    "minimum": 0,
                    "maximum": 100,
                    "description": "Safety score from 0-100"
                },
                "riskFactors": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Key risk factors identified"
                },
                "recommendations": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Safety recommendations"
                },
                "confidence": {
                    "type": "number",
                    "minimum": 0,
                    "maximum": 1,
                    "description": "Confidence level of analysis"
                }
            },
            "required": ["isSafe", "safetyScore", "riskFactors", "recommendations", "confidence"]
        }),
    )
}

pub fn file_encryption_contract() -> Result<StructuredContract, ContractError> {
    StructuredContract::new(
        "file_encryption",
        "Record an encryption assessment of a file sample.",
        json!({
            "type": "object",
            "properties": {
                "isEncrypted": {
                    "type": "boolean",
                    "description": "Whether the file is encrypted"
                },
                "encryptionType": {
                    "type": ["string", "null"],
                    "description": "Type of encryption if present"
                },
                "encryptionStrength": {
                    "type": "string",
                    "enum": ["weak", "moderate", "strong", "unknown"],
                    "description": "Strength of encryption"
                },
                "securityRisks": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Security risks identified"
                },
                "fileSignature": {
                    "type": "string",
                    "description": "File signature/magic bytes"
                },
                "recommendations": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Security recommendations"
                }
            },
            "required": [
                "isEncrypted",
                "encryptionType",
                "encryptionStrength",
                "securityRisks",
                "fileSignature",
                "recommendations"
            ]
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn safety_value() -> Value {
        json!({
            "isSafe": false,
            "safetyScore": 22.5,
            "riskFactors": ["Login from unrecognised country"],
            "recommendations": ["Force a password reset"],
            "confidence": 0.8
        })
    }

    fn encryption_value() -> Value {
        json!({
            "isEncrypted": true,
            "encryptionType": "AES-256-GCM",
            "encryptionStrength": "strong",
            "securityRisks": [],
            "fileSignature": "Salted__",
            "recommendations": ["Store the key separately"]
        })
    }

    #[test]
    fn test_contracts_compile() {
        assert_eq!(threat_safety_contract().unwrap().name(), "threat_safety");
        assert_eq!(file_encryption_contract().unwrap().name(), "file_encryption");
    }

    #[test]
    fn test_tool_carries_schema() {
        let contract = threat_safety_contract().unwrap();
        let tool = contract.tool();
        assert_eq!(tool.name, "threat_safety");
        assert_eq!(tool.input_schema, contract.schema());
        assert_eq!(tool.input_schema["properties"]["safetyScore"]["maximum"], 100);
    }

    #[test]
    fn test_parse_valid_threat_safety() {
        let contract = threat_safety_contract().unwrap();
        let parsed: ThreatSafetyAssessment = contract.parse(safety_value()).unwrap();
        assert!(!parsed.is_safe);
        assert_eq!(parsed.safety_score, 22.5);
        assert_eq!(parsed.risk_factors.len(), 1);
    }

    #[test]
    fn test_score_above_range_rejected() {
        let contract = threat_safety_contract().unwrap();
        let mut value = safety_value();
        value["safetyScore"] = json!(101);
        let err = contract.parse::<ThreatSafetyAssessment>(value).unwrap_err();
        assert!(matches!(err, ContractError::Violation { .. }));
        assert!(err.to_string().contains("safetyScore"));
    }

    #[test]
    fn test_negative_confidence_rejected() {
        let contract = threat_safety_contract().unwrap();
        let mut value = safety_value();
        value["confidence"] = json!(-0.1);
        assert!(contract.parse::<ThreatSafetyAssessment>(value).is_err());
    }

    #[test]
    fn test_confidence_as_percentage_rejected() {
        let contract = threat_safety_contract().unwrap();
        let mut value = safety_value();
        value["confidence"] = json!(80);
        assert!(contract.parse::<ThreatSafetyAssessment>(value).is_err());
    }

    #[test]
    fn test_range_boundaries_accepted() {
        let contract = threat_safety_contract().unwrap();
        let mut value = safety_value();
        value["safetyScore"] = json!(100);
        value["confidence"] = json!(0);
        assert!(contract.parse::<ThreatSafetyAssessment>(value).is_ok());
    }

    #[test]
    fn test_missing_field_rejected() {
        let contract = threat_safety_contract().unwrap();
        let mut value = safety_value();
        value.as_object_mut().unwrap().remove("recommendations");
        assert!(contract.parse::<ThreatSafetyAssessment>(value).is_err());
    }

    #[test]
    fn test_wrong_item_type_rejected() {
        let contract = threat_safety_contract().unwrap();
        let mut value = safety_value();
        value["riskFactors"] = json!(["ok", 7]);
        assert!(contract.parse::<ThreatSafetyAssessment>(value).is_err());
    }

    #[test]
    fn test_parse_valid_file_encryption() {
        let contract = file_encryption_contract().unwrap();
        let parsed: FileEncryptionAssessment = contract.parse(encryption_value()).unwrap();
        assert_eq!(parsed.encryption_strength, EncryptionStrength::Strong);
        assert_eq!(parsed.encryption_type.as_deref(), Some("AES-256-GCM"));
    }

    #[test]
    fn test_null_encryption_type_accepted() {
        let contract = file_encryption_contract().unwrap();
        let mut value = encryption_value();
        value["isEncrypted"] = json!(false);
        value["encryptionType"] = Value::Null;
        value["encryptionStrength"] = json!("unknown");
        let parsed: FileEncryptionAssessment = contract.parse(value).unwrap();
        assert_eq!(parsed.encryption_type, None);
    }

    #[test]
    fn test_omitted_encryption_type_rejected() {
        let contract = file_encryption_contract().unwrap();
        let mut value = encryption_value();
        value.as_object_mut().unwrap().remove("encryptionType");
        assert!(contract.parse::<FileEncryptionAssessment>(value).is_err());
    }

    #[test]
    fn test_unknown_strength_rejected() {
        let contract = file_encryption_contract().unwrap();
        let mut value = encryption_value();
        value["encryptionStrength"] = json!("military-grade");
        let err = contract.parse::<FileEncryptionAssessment>(value).unwrap_err();
        assert!(err.to_string().contains("encryptionStrength"));
    }

    #[test]
    fn test_strength_serializes_lowercase() {
        let json = serde_json::to_string(&EncryptionStrength::Moderate).unwrap();
        assert_eq!(json, r#""moderate""#);
    }

    #[test]
    fn test_assessment_serializes_camel_case() {
        let contract = file_encryption_contract().unwrap();
        let parsed: FileEncryptionAssessment = contract.parse(encryption_value()).unwrap();
        let out = serde_json::to_value(&parsed).unwrap();
        assert_eq!(out, encryption_value());
    }
}

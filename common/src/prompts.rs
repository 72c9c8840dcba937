//! プロンプト生成モジュール
//!
//! Analysis Clientが送る固定の評価指示と、Geminiの`responseSchema`用スキーマ

use crate::types::{FeatureStatus, VerificationStatus};
use serde_json::{json, Value};

/// 検査対象として必ず報告させるセキュリティ特徴
pub const SECURITY_FEATURES: &[&str] = &[
    "Hologram / optically variable device",
    "Microprinting",
    "Guilloche patterns",
    "UV / fluorescent elements",
    "Machine readable zone (MRZ)",
    "Photo integration and tampering",
    "Font and layout consistency",
];

/// 評価プロンプト生成
pub fn build_verification_prompt() -> String {
    let statuses = VerificationStatus::ALL
        .iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(" | ");
    let feature_statuses = FeatureStatus::ALL
        .iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(" | ");
    let features = SECURITY_FEATURES
        .iter()
        .map(|f| format!("- {}", f))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are an expert forensic document examiner. Analyze the attached identity document image and assess whether it is genuine.

## Tasks
1. Identify the document type and the issuing country.
2. Read the personal data fields (multi-language OCR) where legible.
3. Inspect each of the following security features:
{features}
4. Check the document structure against the known template for its type and country.

## Output (strictly this JSON object, no extra text)
{{
  "overall_status": "{statuses}",
  "confidence_score": 0.0-1.0,
  "details": {{
    "document_type": "passport, id_card, driver_license, ...",
    "issuing_country": "country name or ISO code",
    "full_name": "optional",
    "document_number": "optional",
    "date_of_birth": "optional, YYYY-MM-DD",
    "expiration_date": "optional, YYYY-MM-DD"
  }},
  "security_features": [
    {{ "name": "feature name", "status": "{feature_statuses}" }}
  ],
  "summary": "short explanation of the verdict"
}}

If the image is not an identity document or is unreadable, use "unable_to_verify" and explain why in the summary."#
    )
}

/// Gemini `responseSchema`（OpenAPIサブセット）
pub fn response_schema() -> Value {
    let statuses: Vec<&str> = VerificationStatus::ALL.iter().map(|s| s.as_str()).collect();
    let feature_statuses: Vec<&str> = FeatureStatus::ALL.iter().map(|s| s.as_str()).collect();

    json!({
        "type": "OBJECT",
        "properties": {
            "overall_status": { "type": "STRING", "enum": statuses },
            "confidence_score": { "type": "NUMBER" },
            "details": {
                "type": "OBJECT",
                "properties": {
                    "document_type": { "type": "STRING" },
                    "issuing_country": { "type": "STRING" },
                    "full_name": { "type": "STRING" },
                    "document_number": { "type": "STRING" },
                    "date_of_birth": { "type": "STRING" },
                    "expiration_date": { "type": "STRING" }
                },
                "required": ["document_type", "issuing_country"]
            },
            "security_features": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "name": { "type": "STRING" },
                        "status": { "type": "STRING", "enum": feature_statuses }
                    },
                    "required": ["name", "status"]
                }
            },
            "summary": { "type": "STRING" }
        },
        "required": ["overall_status", "confidence_score", "details", "security_features", "summary"]
    })
}

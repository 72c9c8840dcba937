//! 検証結果の表示
//!
//! 結果パネル（テキスト）、エラーバナー、JSON出力

use crate::controller::VerificationState;
use crate::error::Result;
use chrono::NaiveDate;
use doc_verify_common::{FeatureStatus, VerificationResultData, VerificationStatus};
use std::fmt::Write as _;
use std::path::Path;

fn status_icon(status: VerificationStatus) -> &'static str {
    match status {
        VerificationStatus::Verified => "✅",
        VerificationStatus::Suspicious => "⚠️",
        VerificationStatus::Fraudulent => "❌",
        VerificationStatus::UnableToVerify => "❔",
    }
}

fn feature_marker(status: FeatureStatus) -> &'static str {
    match status {
        FeatureStatus::Verified => "✔",
        FeatureStatus::Suspicious => "!",
        FeatureStatus::NotFound => "✘",
        FeatureStatus::NotApplicable => "-",
    }
}

/// 結果パネルを文字列化
pub fn render_result(result: &VerificationResultData, today: NaiveDate) -> String {
    let details = &result.details;
    let or_dash = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {}  (confidence {}%)",
        status_icon(result.overall_status),
        result.overall_status.label(),
        result.confidence_percent()
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "Document details:");
    let _ = writeln!(out, "  Type:            {}", details.document_type);
    let _ = writeln!(out, "  Issuing country: {}", details.issuing_country);
    let _ = writeln!(out, "  Full name:       {}", or_dash(&details.full_name));
    let _ = writeln!(out, "  Document number: {}", or_dash(&details.document_number));
    let _ = writeln!(out, "  Date of birth:   {}", or_dash(&details.date_of_birth));
    let _ = writeln!(out, "  Expiration date: {}", or_dash(&details.expiration_date));
    if details.is_expired(today) == Some(true) {
        let _ = writeln!(out, "  ⚠ Document is expired");
    }

    if !result.security_features.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Security features:");
        for feature in &result.security_features {
            let _ = writeln!(
                out,
                "  [{}] {} ({})",
                feature_marker(feature.status),
                feature.name,
                feature.status.as_str()
            );
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Summary:");
    let _ = writeln!(out, "  {}", result.summary);
    out
}

/// エラーバナー
pub fn render_error(message: &str) -> String {
    format!("❌ {}", message)
}

/// 状態から表示を決める（resultとerrorは排他）
pub fn render_state(state: &VerificationState, today: NaiveDate) -> Option<String> {
    match (&state.result, &state.error) {
        (Some(result), _) => Some(render_result(result, today)),
        (None, Some(error)) => Some(render_error(error)),
        (None, None) => None,
    }
}

pub fn to_json(result: &VerificationResultData) -> Result<String> {
    Ok(serde_json::to_string_pretty(result)?)
}

pub fn write_json(result: &VerificationResultData, output: &Path) -> Result<()> {
    std::fs::write(output, to_json(result)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc_verify_common::{DocumentDetails, SecurityFeature};

    fn sample() -> VerificationResultData {
        VerificationResultData {
            overall_status: VerificationStatus::Suspicious,
            confidence_score: 0.61,
            details: DocumentDetails {
                document_type: "id_card".into(),
                issuing_country: "ESP".into(),
                full_name: Some("Lucia Garcia".into()),
                expiration_date: Some("2024-03-01".into()),
                ..Default::default()
            },
            security_features: vec![
                SecurityFeature { name: "Hologram".into(), status: FeatureStatus::NotFound },
                SecurityFeature { name: "Microprinting".into(), status: FeatureStatus::Verified },
            ],
            summary: "Hologram missing from the expected area.".into(),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    #[test]
    fn test_render_result() {
        let text = render_result(&sample(), today());
        assert!(text.contains("Suspicious"));
        assert!(text.contains("confidence 61%"));
        assert!(text.contains("Lucia Garcia"));
        assert!(text.contains("Document number: -"));
        assert!(text.contains("[✘] Hologram (not_found)"));
        assert!(text.contains("Hologram missing"));
    }

    #[test]
    fn test_render_result_expired_warning() {
        assert!(render_result(&sample(), today()).contains("Document is expired"));

        let mut valid = sample();
        valid.details.expiration_date = Some("2030-01-01".into());
        assert!(!render_result(&valid, today()).contains("expired"));
    }

    #[test]
    fn test_render_state_error() {
        let state = VerificationState {
            error: Some("Verification Failed: service unavailable".into()),
            ..Default::default()
        };
        assert_eq!(
            render_state(&state, today()).as_deref(),
            Some("❌ Verification Failed: service unavailable")
        );
        assert!(render_state(&VerificationState::default(), today()).is_none());
    }

    #[test]
    fn test_write_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("result.json");
        write_json(&sample(), &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let parsed: VerificationResultData = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed, sample());
        assert!(content.contains("\"overall_status\": \"suspicious\""));
    }
}

//! APIレスポンスパーサー
//!
//! Gemini等のレスポンステキストからJSONを抽出し、
//! VerificationResultDataとしてパース・検証する

use crate::error::{Error, Result};
use crate::types::VerificationResultData;

/// APIレスポンスからJSON部分を抽出
///
/// 抽出優先順位:
/// 1. ```json ... ``` ブロック
/// 2. 生の {...} オブジェクト
/// 3. エラー
///
/// # Examples
/// ```
/// use doc_verify_common::extract_json;
///
/// let response = "result: {\"summary\": \"ok\"}";
/// let json = extract_json(response).unwrap();
/// assert_eq!(json, "{\"summary\": \"ok\"}");
/// ```
pub fn extract_json(response: &str) -> Result<&str> {
    if let Some(start_marker) = response.find("```json") {
        let start = start_marker + 7; // "```json" の長さ
        if let Some(end_offset) = response[start..].find("```") {
            let end = start + end_offset;
            return Ok(response[start..end].trim());
        }
    }

    if let Some(start) = response.find('{') {
        if let Some(end) = response.rfind('}') {
            if end >= start {
                return Ok(&response[start..=end]);
            }
        }
    }

    Err(Error::Parse("no JSON object found in response".into()))
}

/// 検証レスポンスをパース
///
/// 型として読めても内容が不正な結果（信頼度の範囲外、必須項目の空欄など）はSchemaエラー
pub fn parse_verification_response(response: &str) -> Result<VerificationResultData> {
    let json_str = extract_json(response)?;
    let result: VerificationResultData = serde_json::from_str(json_str.trim())
        .map_err(|e| Error::Parse(format!("verification JSON parse error: {}", e)))?;
    validate_result(result)
}

/// 内容検証と正規化
///
/// - confidence_score: 0-1はそのまま、1超100以下は/100で正規化、それ以外はエラー
/// - document_type / issuing_country / summary: 空欄はエラー
/// - 任意項目の空文字はNoneへ
pub fn validate_result(mut result: VerificationResultData) -> Result<VerificationResultData> {
    result.confidence_score = normalize_confidence(result.confidence_score)?;

    let details = &mut result.details;
    require_text("details.document_type", &details.document_type)?;
    require_text("details.issuing_country", &details.issuing_country)?;
    details.document_type = details.document_type.trim().to_string();
    details.issuing_country = details.issuing_country.trim().to_string();

    for field in [
        &mut details.full_name,
        &mut details.document_number,
        &mut details.date_of_birth,
        &mut details.expiration_date,
    ] {
        if field.as_deref().is_some_and(|s| s.trim().is_empty()) {
            *field = None;
        }
    }

    require_text("summary", &result.summary)?;

    for feature in &result.security_features {
        require_text("security_features[].name", &feature.name)?;
    }

    Ok(result)
}

fn normalize_confidence(score: f64) -> Result<f64> {
    if !score.is_finite() || score < 0.0 {
        return Err(Error::Schema(format!("confidence_score out of range: {}", score)));
    }
    if score <= 1.0 {
        return Ok(score);
    }
    if score <= 100.0 {
        return Ok(score / 100.0);
    }
    Err(Error::Schema(format!("confidence_score out of range: {}", score)))
}

fn require_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::Schema(format!("{} is missing", field)));
    }
    Ok(())
}

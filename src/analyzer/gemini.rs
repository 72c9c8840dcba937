//! Gemini API連携
//!
//! 固定の評価プロンプトと画像を`generateContent`へ送り、
//! 返却テキストをVerificationResultDataとしてパース・検証する

use super::{is_valid_media_type, DocumentAnalyzer};
use crate::config::{Config, DEFAULT_ENDPOINT, DEFAULT_MODEL};
use crate::error::{Result, VerifyError};
use doc_verify_common::{
    build_verification_prompt, parse_verification_response, response_schema,
    VerificationResultData,
};
use serde::{Deserialize, Serialize};
use std::fmt;

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini APIリクエスト
#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
    #[serde(rename = "responseSchema")]
    response_schema: serde_json::Value,
}

/// Gemini APIレスポンス
#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(rename = "promptFeedback")]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct PromptFeedback {
    #[serde(rename = "blockReason")]
    block_reason: Option<String>,
}

/// エラーレスポンス本体 `{"error": {"code", "message", "status"}}`
#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Gemini Analysis Client
///
/// APIキーは生成時に明示的に渡す（環境変数は読まない）
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiClient")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }

    /// 設定からクライアントを構築（タイムアウト・モデル・エンドポイント）
    pub fn from_config(config: &Config, api_key: impl Into<String>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| VerifyError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            api_key: api_key.into(),
            model: config.model.clone(),
            endpoint: config.endpoint.clone(),
        })
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// APIキーはURLに含めない（`x-goog-api-key`ヘッダーで送る）
    fn generate_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }
}

impl DocumentAnalyzer for GeminiClient {
    fn ensure_configured(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(VerifyError::MissingApiKey);
        }
        Ok(())
    }

    async fn analyze(&self, base64_image: &str, media_type: &str) -> Result<VerificationResultData> {
        self.ensure_configured()?;
        if base64_image.trim().is_empty() {
            return Err(VerifyError::Encoding("image data is empty".into()));
        }
        if !is_valid_media_type(media_type) {
            return Err(VerifyError::UnsupportedFormat(media_type.to_string()));
        }

        let request = build_request(base64_image, media_type);
        log::info!(
            "sending {} ({} base64 chars) to {}",
            media_type,
            base64_image.len(),
            self.model
        );

        let response = self
            .http
            .post(self.generate_url())
            .header(API_KEY_HEADER, self.api_key.trim())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::warn!("Gemini returned HTTP {}", status.as_u16());
            return Err(VerifyError::Service(describe_api_error(status.as_u16(), &body)));
        }

        let payload: GeminiResponse = response.json().await?;
        let text = extract_text(payload)?;
        log::debug!("response text: {} chars", text.len());

        Ok(parse_verification_response(&text)?)
    }
}

fn build_request(base64_image: &str, media_type: &str) -> GeminiRequest {
    GeminiRequest {
        contents: vec![Content {
            parts: vec![
                Part::Text {
                    text: build_verification_prompt(),
                },
                Part::InlineData {
                    inline_data: InlineData {
                        mime_type: media_type.to_string(),
                        data: base64_image.to_string(),
                    },
                },
            ],
        }],
        generation_config: GenerationConfig {
            temperature: 0.1,
            response_mime_type: "application/json".to_string(),
            response_schema: response_schema(),
        },
    }
}

/// 最初の候補のテキスト部分を取り出す
fn extract_text(response: GeminiResponse) -> Result<String> {
    if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(VerifyError::Service(format!("request blocked by Gemini: {}", reason)));
    }

    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| VerifyError::Service("Empty response from Gemini".into()))?;

    let text = candidate
        .content
        .and_then(|c| c.parts.into_iter().find_map(|p| p.text))
        .filter(|t| !t.trim().is_empty());

    match (text, candidate.finish_reason) {
        (Some(text), _) => Ok(text),
        (None, Some(reason)) => Err(VerifyError::Service(format!(
            "Empty response from Gemini (finish reason: {})",
            reason
        ))),
        (None, None) => Err(VerifyError::Service("Empty response from Gemini".into())),
    }
}

fn describe_api_error(status: u16, body: &str) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) => format!("Gemini API error {}: {}", status, parsed.error.message),
        Err(_) if body.trim().is_empty() => format!("Gemini API error {}", status),
        Err(_) => {
            let snippet: String = body.chars().take(200).collect();
            format!("Gemini API error {}: {}", status, snippet.trim())
        }
    }
}

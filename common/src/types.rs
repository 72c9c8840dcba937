//! 検証フローの型定義
//!
//! CLIとAnalysis Clientで共有される型:
//! - UploadedFile: ユーザーが選択した画像と宣言MIMEタイプ
//! - ProgressState: 解析待ち中に表示する進捗ラベル
//! - VerificationResultData: AIサービスから得た構造化判定結果

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// アップロードされた書類画像
///
/// 1回の検証試行の間だけControllerが保持し、次のsubmitで丸ごと置き換えられる
#[derive(Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub file_name: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
    /// ディスクから読んだ場合の元パス
    pub source: Option<PathBuf>,
}

impl UploadedFile {
    pub fn new(file_name: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            media_type: media_type.into(),
            bytes,
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<PathBuf>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

// 画像バイト列はログに出さない
impl fmt::Debug for UploadedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadedFile")
            .field("file_name", &self.file_name)
            .field("media_type", &self.media_type)
            .field("bytes", &format_args!("<{} bytes>", self.bytes.len()))
            .field("source", &self.source)
            .finish()
    }
}

/// 進捗表示（percentは0-100）
///
/// 外部サービスの実処理とは無関係な表示用ラベル
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressState {
    pub percent: u8,
    pub text: String,
}

impl ProgressState {
    pub fn new(percent: u8, text: impl Into<String>) -> Self {
        Self {
            percent: percent.min(100),
            text: text.into(),
        }
    }
}

/// 総合判定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    Verified,
    Suspicious,
    Fraudulent,
    UnableToVerify,
}

impl VerificationStatus {
    pub const ALL: [VerificationStatus; 4] = [
        VerificationStatus::Verified,
        VerificationStatus::Suspicious,
        VerificationStatus::Fraudulent,
        VerificationStatus::UnableToVerify,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationStatus::Verified => "verified",
            VerificationStatus::Suspicious => "suspicious",
            VerificationStatus::Fraudulent => "fraudulent",
            VerificationStatus::UnableToVerify => "unable_to_verify",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            VerificationStatus::Verified => "Verified",
            VerificationStatus::Suspicious => "Suspicious",
            VerificationStatus::Fraudulent => "Fraudulent",
            VerificationStatus::UnableToVerify => "Unable to Verify",
        }
    }
}

/// セキュリティ特徴ごとの判定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureStatus {
    Verified,
    Suspicious,
    NotFound,
    NotApplicable,
}

impl FeatureStatus {
    pub const ALL: [FeatureStatus; 4] = [
        FeatureStatus::Verified,
        FeatureStatus::Suspicious,
        FeatureStatus::NotFound,
        FeatureStatus::NotApplicable,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureStatus::Verified => "verified",
            FeatureStatus::Suspicious => "suspicious",
            FeatureStatus::NotFound => "not_found",
            FeatureStatus::NotApplicable => "not_applicable",
        }
    }
}

/// 書類メタデータ
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentDetails {
    pub document_type: String,
    pub issuing_country: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_number: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<String>,
}

/// 有効期限として受け付ける日付書式
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%d.%m.%Y", "%Y/%m/%d"];

impl DocumentDetails {
    /// 有効期限をパース（書式不明ならNone）
    pub fn expiration(&self) -> Option<NaiveDate> {
        let raw = self.expiration_date.as_deref()?.trim();
        DATE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
    }

    /// `today`時点で期限切れか
    ///
    /// 期限が読み取れない場合はNone
    pub fn is_expired(&self, today: NaiveDate) -> Option<bool> {
        self.expiration().map(|exp| exp < today)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityFeature {
    pub name: String,
    pub status: FeatureStatus,
}

/// 構造化された検証結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationResultData {
    pub overall_status: VerificationStatus,
    /// 0.0-1.0に正規化済み
    pub confidence_score: f64,
    pub details: DocumentDetails,
    #[serde(default)]
    pub security_features: Vec<SecurityFeature>,
    pub summary: String,
}

impl VerificationResultData {
    /// 表示用の信頼度（0-100）
    pub fn confidence_percent(&self) -> u8 {
        (self.confidence_score.clamp(0.0, 1.0) * 100.0).round() as u8
    }
}

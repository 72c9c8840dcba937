use thiserror::Error;

/// 検証失敗としてユーザーに表示する際の接頭辞
pub const FAILURE_PREFIX: &str = "Verification Failed: ";

#[derive(Error, Debug)]
pub enum VerifyError {
    #[error("API key is not configured. Please set the API_KEY environment variable.")]
    MissingApiKey,

    #[error("Config error: {0}")]
    Config(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("File too large: {size} bytes (limit {limit} bytes)")]
    FileTooLarge { size: u64, limit: u64 },

    #[error("Could not read document: {0}")]
    Encoding(String),

    /// 通信失敗・非2xx・空レスポンス（理由をそのまま表示）
    #[error("{0}")]
    Service(String),

    #[error("Malformed analysis response: {0}")]
    InvalidResponse(String),

    #[error("A verification is already in progress")]
    AttemptInProgress,

    #[error("An unknown error occurred during verification.")]
    Unknown,

    #[error(transparent)]
    Common(#[from] doc_verify_common::Error),

    #[error("JSON error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl VerifyError {
    /// 試行中のエラーをエラーバナー用の文言へ変換
    pub fn to_failure_message(&self) -> String {
        format!("{}{}", FAILURE_PREFIX, self)
    }

    /// 試行前に弾かれるエラーか（状態を変更しない）
    pub fn is_precondition(&self) -> bool {
        matches!(self, VerifyError::MissingApiKey | VerifyError::AttemptInProgress)
    }
}

impl From<reqwest::Error> for VerifyError {
    fn from(err: reqwest::Error) -> Self {
        // URLはエラー文言に含めない
        let err = err.without_url();
        if err.is_timeout() {
            VerifyError::Service(format!("request timed out: {}", err))
        } else if err.is_decode() {
            VerifyError::InvalidResponse(err.to_string())
        } else {
            VerifyError::Service(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, VerifyError>;

use crate::error::{Result, VerifyError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// APIキーを読む環境変数（優先順）
pub const API_KEY_ENV_VARS: &[&str] = &["GEMINI_API_KEY", "API_KEY"];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
    /// 0で無制限
    pub timeout_seconds: u64,
    pub max_file_size_mb: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.into(),
            endpoint: DEFAULT_ENDPOINT.into(),
            timeout_seconds: 120,
            max_file_size_mb: 20, // Gemini inline_dataの上限
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| VerifyError::Config("home directory not found".into()))?;
        Ok(home.join(".config").join("doc-verify").join("config.json"))
    }

    /// APIキーを解決（環境変数を優先、空文字は未設定扱い）
    pub fn resolve_api_key(&self) -> Option<String> {
        let from_env = API_KEY_ENV_VARS
            .iter()
            .filter_map(|name| std::env::var(name).ok());
        self.resolve_api_key_from(from_env)
    }

    fn resolve_api_key_from(&self, env_values: impl IntoIterator<Item = String>) -> Option<String> {
        env_values
            .into_iter()
            .chain(self.api_key.clone())
            .map(|key| key.trim().to_string())
            .find(|key| !key.is_empty())
    }

    pub fn set_api_key(&mut self, key: String) -> Result<()> {
        if key.trim().is_empty() {
            return Err(VerifyError::Config("API key must not be empty".into()));
        }
        self.api_key = Some(key.trim().to_string());
        self.save()
    }

    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_mb.saturating_mul(1024 * 1024)
    }

    pub fn timeout(&self) -> Option<std::time::Duration> {
        (self.timeout_seconds > 0).then(|| std::time::Duration::from_secs(self.timeout_seconds))
    }
}

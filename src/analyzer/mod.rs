//! Analysis Client
//!
//! 画像（Base64）を外部AIサービスへ送り、構造化された判定結果を得る

mod gemini;

pub use gemini::GeminiClient;

use crate::error::Result;
use doc_verify_common::VerificationResultData;
use std::future::Future;

/// Controllerから見たAnalysis Clientの差し替え口
pub trait DocumentAnalyzer {
    /// 資格情報（APIキー）が揃っているか
    ///
    /// submitの前提条件。失敗時は状態を一切変更せずに返る
    fn ensure_configured(&self) -> Result<()> {
        Ok(())
    }

    /// 1回だけ呼び出す（リトライなし、部分結果なし）
    fn analyze(
        &self,
        base64_image: &str,
        media_type: &str,
    ) -> impl Future<Output = Result<VerificationResultData>> + Send;
}

/// MIMEタイプが `type/subtype` 形式か
pub(crate) fn is_valid_media_type(media_type: &str) -> bool {
    let mut parts = media_type.splitn(2, '/');
    match (parts.next(), parts.next()) {
        (Some(kind), Some(sub)) => {
            !kind.is_empty()
                && !sub.is_empty()
                && !media_type.chars().any(char::is_whitespace)
        }
        _ => false,
    }
}

//! 書類ファイルの読み込み
//!
//! ファイル選択の代わりにパスから`UploadedFile`を作る

use crate::error::{Result, VerifyError};
use doc_verify_common::UploadedFile;
use std::path::Path;

/// 受け付ける拡張子とMIMEタイプ
const MEDIA_TYPES: &[(&str, &str)] = &[
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("webp", "image/webp"),
    ("heic", "image/heic"),
    ("heif", "image/heif"),
    ("gif", "image/gif"),
    ("bmp", "image/bmp"),
    ("pdf", "application/pdf"),
];

/// 拡張子からMIMEタイプを判定（大文字小文字は区別しない）
pub fn media_type_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_string_lossy().to_lowercase();
    MEDIA_TYPES
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, mime)| *mime)
}

/// 書類ファイルを読み込む
///
/// `max_size`バイトを超えるファイルは送信前に拒否
pub async fn load_document(path: &Path, max_size: u64) -> Result<UploadedFile> {
    if !path.is_file() {
        return Err(VerifyError::FileNotFound(path.display().to_string()));
    }

    let media_type = media_type_for(path)
        .ok_or_else(|| VerifyError::UnsupportedFormat(path.display().to_string()))?;

    let size = tokio::fs::metadata(path).await?.len();
    if size > max_size {
        return Err(VerifyError::FileTooLarge { size, limit: max_size });
    }

    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| VerifyError::Encoding(format!("{}: {}", path.display(), e)))?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let file = UploadedFile::new(file_name, media_type, bytes).with_source(path);
    if file.is_empty() {
        return Err(VerifyError::Encoding(format!("{} is empty", path.display())));
    }

    log::debug!("loaded {} ({} bytes, {})", file.file_name, file.len(), file.media_type);

    Ok(file)
}

/// プレビュー参照（ローカルで導出、送信はしない）
pub fn preview_reference(file: &UploadedFile) -> String {
    match &file.source {
        Some(path) => {
            let absolute = path.canonicalize().unwrap_or_else(|_| path.clone());
            format!("file://{}", absolute.display().to_string().replace('\\', "/"))
        }
        None => format!("memory://{}", file.file_name),
    }
}

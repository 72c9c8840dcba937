//! エラーケーステスト
//!
//! エラー種別ごとの表示文言とエラーバナー整形を検証

use doc_verify::error::{VerifyError, FAILURE_PREFIX};

/// VerifyErrorのDisplay実装確認
#[test]
fn test_error_display() {
    let errors = vec![
        VerifyError::Config("bad config".to_string()),
        VerifyError::FileNotFound("id.jpg".to_string()),
        VerifyError::UnsupportedFormat("id.txt".to_string()),
        VerifyError::FileTooLarge { size: 30, limit: 20 },
        VerifyError::Encoding("unreadable".to_string()),
        VerifyError::Service("timeout".to_string()),
        VerifyError::InvalidResponse("truncated".to_string()),
        VerifyError::AttemptInProgress,
        VerifyError::Unknown,
        VerifyError::MissingApiKey,
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty(), "empty error message: {:?}", err);
    }
}

/// 設定不足エラーは固定文言
#[test]
fn test_missing_api_key_message() {
    let err = VerifyError::MissingApiKey;
    assert_eq!(
        err.to_string(),
        "API key is not configured. Please set the API_KEY environment variable."
    );
    assert!(err.is_precondition());
}

/// サービスエラーは理由をそのまま接頭辞の後ろに
#[test]
fn test_service_failure_message() {
    let err = VerifyError::Service("service unavailable".to_string());
    assert_eq!(err.to_failure_message(), "Verification Failed: service unavailable");
    assert!(!err.is_precondition());
}

#[test]
fn test_encoding_failure_message() {
    let err = VerifyError::Encoding("permission denied".to_string());
    let message = err.to_failure_message();
    assert!(message.starts_with(FAILURE_PREFIX));
    assert!(message.contains("permission denied"));
}

#[test]
fn test_unknown_failure_message() {
    assert_eq!(
        VerifyError::Unknown.to_failure_message(),
        "Verification Failed: An unknown error occurred during verification."
    );
}

/// common::Errorからの変換（透過的）
#[test]
fn test_common_error_conversion() {
    let common_err = doc_verify_common::Error::Schema("confidence_score out of range: 150".to_string());
    let err: VerifyError = common_err.into();

    assert!(matches!(err, VerifyError::Common(_)));
    assert_eq!(err.to_string(), "Schema error: confidence_score out of range: 150");
}

/// パース失敗のレスポンスも接頭辞付きで表示される
#[test]
fn test_schema_failure_message() {
    let err: VerifyError = doc_verify_common::parse_verification_response("not json")
        .unwrap_err()
        .into();
    assert!(err.to_failure_message().starts_with("Verification Failed: Parse error"));
}

/// IOエラーからの変換
#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: VerifyError = io_err.into();

    assert!(matches!(err, VerifyError::Io(_)));
    assert!(err.to_string().contains("IO"));
}

/// JSONエラーからの変換
#[test]
fn test_json_error_conversion() {
    let json_err = serde_json::from_str::<serde_json::Value>("{ invalid }").unwrap_err();
    let err: VerifyError = json_err.into();

    assert!(matches!(err, VerifyError::JsonParse(_)));
}

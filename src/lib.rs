//! doc-verify
//!
//! 本人確認書類の画像をAIサービスへ送り、真贋判定を得るツール

pub mod analyzer;
pub mod cli;
pub mod config;
pub mod controller;
pub mod document;
pub mod error;
pub mod report;

pub use analyzer::{DocumentAnalyzer, GeminiClient};
pub use controller::{Phase, VerificationController, VerificationState};
pub use error::{Result, VerifyError};

//! Document Verify Common Library
//!
//! CLIとAnalysis Clientで共有される型とユーティリティ（ネットワーク非依存）

pub mod types;
pub mod error;
pub mod parser;
pub mod prompts;
pub mod progress;

pub use types::{
    DocumentDetails, FeatureStatus, ProgressState, SecurityFeature, UploadedFile,
    VerificationResultData, VerificationStatus,
};
pub use error::{Error, Result};
pub use parser::{extract_json, parse_verification_response, validate_result};
pub use prompts::{build_verification_prompt, response_schema};
pub use progress::ProgressSchedule;

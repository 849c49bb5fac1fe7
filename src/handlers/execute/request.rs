//! Execute-code request DTOs

use serde::Deserialize;
use serde_json::Value;
use validator::Validate;

/// Execute-code request body
#[derive(Debug, Deserialize, Validate)]
pub struct ExecuteCodeRequest {
    /// Submission source code
    #[validate(length(min = 1, max = 262144))] // 256 KiB max
    pub code: String,

    /// Programming language
    #[validate(length(min = 1, max = 32))]
    pub language: String,

    /// Input literal (JSON value, or a string containing a literal)
    pub input: Value,

    /// Expected-output literal (same forms as `input`)
    pub expected: Value,
}

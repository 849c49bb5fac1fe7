//! Execute-code response DTOs

use serde::Serialize;
use serde_json::Value;

use crate::models::ExecutionResult;

/// Execute-code response body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteCodeResponse {
    pub passed: bool,
    pub message: String,
    pub error: Option<String>,
    pub output: Option<Value>,
    pub execution_time_ms: f64,
}

impl From<ExecutionResult> for ExecuteCodeResponse {
    fn from(result: ExecutionResult) -> Self {
        Self {
            passed: result.passed,
            message: result.message,
            error: result.error,
            output: result.output,
            execution_time_ms: result.execution_time_ms,
        }
    }
}

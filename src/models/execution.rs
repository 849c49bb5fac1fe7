//! Execution request/result domain models

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single grading request, immutable once received.
///
/// `input` and `expected` are language-agnostic literals. They may arrive
/// either as JSON values or as strings containing a literal (the client
/// harness sends strings, e.g. `"{\"nums\": [2, 7, 11, 15], \"target\": 9}"`).
#[derive(Debug, Clone, Deserialize)]
pub struct ExecutionRequest {
    /// Untrusted submission source code
    pub code: String,

    /// Language identifier (python | javascript | typescript)
    pub language: String,

    /// Literal the submission's entry point is called with
    pub input: Value,

    /// Literal the submission's output is compared against
    pub expected: Value,
}

/// Terminal verdict for one request; never mutated after creation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResult {
    /// Whether the submission's output matched the expected value
    pub passed: bool,

    /// Human-readable summary
    pub message: String,

    /// Structured error detail (compile diagnostic, stderr excerpt, ...)
    pub error: Option<String>,

    /// Normalized actual output, when the submission produced one
    pub output: Option<Value>,

    /// Measured sandbox wall-clock duration in milliseconds
    pub execution_time_ms: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_accepts_literal_strings_and_values() {
        let req: ExecutionRequest = serde_json::from_value(json!({
            "code": "class Solution: pass",
            "language": "python",
            "input": "{\"nums\": [2, 7, 11, 15], \"target\": 9}",
            "expected": [0, 1],
        }))
        .unwrap();

        assert!(req.input.is_string());
        assert!(req.expected.is_array());
    }

    #[test]
    fn test_result_serializes_camel_case() {
        let result = ExecutionResult {
            passed: true,
            message: "Test passed".into(),
            error: None,
            output: Some(json!([0, 1])),
            execution_time_ms: 12.5,
        };

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["executionTimeMs"], 12.5);
        assert_eq!(value["passed"], true);
        assert!(value["error"].is_null());
    }
}

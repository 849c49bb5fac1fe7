//! Verdict Assembler
//!
//! Pure composition of the final `ExecutionResult` from sandbox and
//! comparator outputs. Limit breaches use fixed messages that leak no
//! internal detail; crashes carry a bounded stderr excerpt.

use std::time::Duration;

use crate::{constants::MAX_STDERR_EXCERPT_CHARS, models::ExecutionResult};

use super::{
    compare::Comparison,
    sandbox::{CompletionCause, SandboxResult},
    synthesis::SynthesisError,
};

/// Verdict for a run that completed cleanly, decided by the comparator.
pub fn from_comparison(comparison: Comparison, duration: Duration) -> ExecutionResult {
    if comparison.matches {
        ExecutionResult {
            passed: true,
            message: "Test passed".to_string(),
            error: None,
            output: Some(comparison.actual),
            execution_time_ms: millis(duration),
        }
    } else {
        ExecutionResult {
            passed: false,
            message: format!(
                "Expected {}, but got {}",
                render(&comparison.expected),
                render(&comparison.actual)
            ),
            error: None,
            output: Some(comparison.actual),
            execution_time_ms: millis(duration),
        }
    }
}

/// Verdict for a run that stopped for any reason other than `Completed`.
pub fn from_sandbox_failure(result: &SandboxResult) -> ExecutionResult {
    let (message, error) = match result.cause {
        CompletionCause::TimedOut => (
            "Execution timed out".to_string(),
            result.cause.as_str().to_string(),
        ),
        CompletionCause::ResourceExceeded => (
            "Execution exceeded resource limits".to_string(),
            result.cause.as_str().to_string(),
        ),
        CompletionCause::Crashed | CompletionCause::Completed => (
            "Submission crashed during execution".to_string(),
            stderr_excerpt(result).unwrap_or_else(|| result.cause.as_str().to_string()),
        ),
    };

    ExecutionResult {
        passed: false,
        message,
        error: Some(error),
        output: None,
        execution_time_ms: millis(result.duration),
    }
}

/// Verdict for a run whose stdout hit the capture cap. Grading a partial
/// capture would compare against an arbitrary prefix, so the truncation is
/// reported instead.
pub fn from_truncated_output(result: &SandboxResult) -> ExecutionResult {
    ExecutionResult {
        passed: false,
        message: "Output exceeded the capture limit and was truncated".to_string(),
        error: Some("OutputTruncated".to_string()),
        output: None,
        execution_time_ms: millis(result.duration),
    }
}

/// Verdict for a failed compile step; the compiler diagnostic is the error.
pub fn from_compile_failure(result: &SandboxResult) -> ExecutionResult {
    let diagnostic = match result.cause {
        CompletionCause::TimedOut => "Compilation timed out".to_string(),
        _ => {
            // tsc writes diagnostics to stdout, most compilers to stderr.
            let combined = format!("{}{}", result.stdout, result.stderr);
            let trimmed = combined.trim();
            if trimmed.is_empty() {
                "Compilation failed".to_string()
            } else {
                excerpt(trimmed)
            }
        }
    };

    ExecutionResult {
        passed: false,
        message: "Compilation failed".to_string(),
        error: Some(diagnostic),
        output: None,
        execution_time_ms: millis(result.duration),
    }
}

/// Verdict for a submission that could not be prepared for execution.
pub fn from_synthesis_error(err: &SynthesisError) -> ExecutionResult {
    ExecutionResult {
        passed: false,
        message: "Failed to prepare submission for execution".to_string(),
        error: Some(err.to_string()),
        output: None,
        execution_time_ms: 0.0,
    }
}

/// Verdict when the overall request deadline fires; indistinguishable from
/// a sandbox timeout by design.
pub fn deadline_exceeded(deadline: Duration) -> ExecutionResult {
    ExecutionResult {
        passed: false,
        message: "Execution timed out".to_string(),
        error: Some(CompletionCause::TimedOut.as_str().to_string()),
        output: None,
        execution_time_ms: millis(deadline),
    }
}

fn millis(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}

fn render(value: &serde_json::Value) -> String {
    value.to_string()
}

fn stderr_excerpt(result: &SandboxResult) -> Option<String> {
    let trimmed = result.stderr.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(excerpt(trimmed))
    }
}

fn excerpt(text: &str) -> String {
    if text.chars().count() <= MAX_STDERR_EXCERPT_CHARS {
        text.to_string()
    } else {
        let head: String = text.chars().take(MAX_STDERR_EXCERPT_CHARS).collect();
        format!("{head} [truncated]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sandbox_result(cause: CompletionCause, stderr: &str) -> SandboxResult {
        SandboxResult {
            stdout: String::new(),
            stderr: stderr.to_string(),
            exit_code: None,
            cause,
            duration: Duration::from_millis(40),
            stdout_truncated: false,
            stderr_truncated: false,
        }
    }

    #[test]
    fn test_passing_comparison() {
        let verdict = from_comparison(
            Comparison {
                matches: true,
                actual: json!([0, 1]),
                expected: json!([0, 1]),
            },
            Duration::from_millis(12),
        );
        assert!(verdict.passed);
        assert_eq!(verdict.output, Some(json!([0, 1])));
        assert!(verdict.error.is_none());
        assert!((verdict.execution_time_ms - 12.0).abs() < 0.01);
    }

    #[test]
    fn test_mismatch_message_names_both_values() {
        let verdict = from_comparison(
            Comparison {
                matches: false,
                actual: json!([1, 0]),
                expected: json!([0, 1]),
            },
            Duration::from_millis(5),
        );
        assert!(!verdict.passed);
        assert!(verdict.message.contains("[0,1]"));
        assert!(verdict.message.contains("[1,0]"));
    }

    #[test]
    fn test_timeout_error_is_fixed_and_non_leaky() {
        let verdict = from_sandbox_failure(&sandbox_result(
            CompletionCause::TimedOut,
            "killed after internal deadline /tmp/duelbox-abc123",
        ));
        assert!(!verdict.passed);
        assert_eq!(verdict.error.as_deref(), Some("TimedOut"));
        assert!(!verdict.message.contains("/tmp"));
    }

    #[test]
    fn test_crash_carries_stderr_excerpt() {
        let verdict = from_sandbox_failure(&sandbox_result(
            CompletionCause::Crashed,
            "Traceback (most recent call last): ...",
        ));
        assert!(verdict.error.as_deref().unwrap().contains("Traceback"));
    }

    #[test]
    fn test_long_stderr_is_excerpted() {
        let long = "x".repeat(5 * MAX_STDERR_EXCERPT_CHARS);
        let verdict = from_sandbox_failure(&sandbox_result(CompletionCause::Crashed, &long));
        let error = verdict.error.unwrap();
        assert!(error.len() < long.len());
        assert!(error.ends_with("[truncated]"));
    }

    #[test]
    fn test_truncated_output_is_never_graded_silently() {
        let mut result = sandbox_result(CompletionCause::Completed, "");
        result.stdout = "x".repeat(16);
        result.stdout_truncated = true;
        result.exit_code = Some(0);

        let verdict = from_truncated_output(&result);
        assert!(!verdict.passed);
        assert!(verdict.message.contains("truncated"));
        assert_eq!(verdict.error.as_deref(), Some("OutputTruncated"));
        assert!(verdict.output.is_none());
    }

    #[test]
    fn test_compile_failure_uses_diagnostic() {
        let mut result = sandbox_result(CompletionCause::Crashed, "");
        result.stdout = "solution.ts(3,5): error TS2322: Type 'string' is not assignable".into();
        let verdict = from_compile_failure(&result);
        assert!(!verdict.passed);
        assert_eq!(verdict.message, "Compilation failed");
        assert!(verdict.error.unwrap().contains("TS2322"));
    }
}

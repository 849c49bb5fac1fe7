//! Harness Synthesizer
//!
//! Turns an untrusted submission into a self-contained runnable program:
//! submission code plus a generated driver that deserializes the input into
//! call arguments, invokes the entry point, and writes the serialized result
//! to stdout. Submission code is treated as opaque text; nothing here
//! executes it.

use serde_json::Value;

use super::{languages::LanguageAdapter, literal};

/// The submission's code plus generated driver code and the invocation
/// commands. Owned exclusively by one request; never reused.
#[derive(Debug)]
pub struct SynthesizedProgram {
    pub language: String,
    /// File name the program text is written to inside the scratch dir
    pub source_file: String,
    /// Full program text (submission + driver)
    pub source: String,
    pub compile_command: Option<Vec<String>>,
    pub run_command: Vec<String>,
}

/// Errors preparing a submission for execution. These surface as failing
/// verdicts, not HTTP errors: the request itself was well-formed.
#[derive(Debug, thiserror::Error)]
pub enum SynthesisError {
    #[error("input literal supplies no call arguments")]
    EmptyArguments,

    #[error("failed to encode call arguments: {0}")]
    EncodeArguments(String),
}

/// Synthesize a runnable program for one submission.
///
/// Argument convention (shared across adapters): a JSON object supplies one
/// argument per entry in the caller's key order; any other literal is a
/// single argument. The argument vector is embedded into the driver as a
/// JSON *string literal*, which is valid source in both Python and
/// JavaScript and keeps input values from being interpreted as code.
pub fn synthesize(
    adapter: &LanguageAdapter,
    code: &str,
    input: &Value,
) -> Result<SynthesizedProgram, SynthesisError> {
    let args = call_arguments(input)?;

    let args_json = serde_json::to_string(&Value::Array(args))
        .map_err(|e| SynthesisError::EncodeArguments(e.to_string()))?;
    // Second encoding produces the quoted, escaped string literal.
    let args_literal = serde_json::to_string(&args_json)
        .map_err(|e| SynthesisError::EncodeArguments(e.to_string()))?;

    let source = adapter.synthesize_driver(code, &args_literal);

    Ok(SynthesizedProgram {
        language: adapter.language().to_string(),
        source_file: adapter.source_file().to_string(),
        source,
        compile_command: adapter
            .compile_command()
            .map(|cmd| cmd.iter().map(|s| s.to_string()).collect()),
        run_command: adapter.run_command().iter().map(|s| s.to_string()).collect(),
    })
}

/// Derive the call-argument vector from the input literal.
fn call_arguments(input: &Value) -> Result<Vec<Value>, SynthesisError> {
    match literal::resolve(input) {
        Value::Object(map) => {
            if map.is_empty() {
                return Err(SynthesisError::EmptyArguments);
            }
            Ok(map.into_iter().map(|(_, v)| v).collect())
        }
        other => Ok(vec![other]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_object_input_becomes_arguments_in_key_order() {
        let args =
            call_arguments(&json!("{\"nums\": [2, 7, 11, 15], \"target\": 9}")).unwrap();
        assert_eq!(args, vec![json!([2, 7, 11, 15]), json!(9)]);
    }

    #[test]
    fn test_scalar_and_array_inputs_become_single_argument() {
        assert_eq!(
            call_arguments(&json!("[\"h\",\"e\",\"l\",\"l\",\"o\"]")).unwrap(),
            vec![json!(["h", "e", "l", "l", "o"])]
        );
        assert_eq!(
            call_arguments(&json!("\"A man, a plan\"")).unwrap(),
            vec![json!("A man, a plan")]
        );
        assert_eq!(call_arguments(&json!(42)).unwrap(), vec![json!(42)]);
    }

    #[test]
    fn test_empty_object_is_a_synthesis_error() {
        let err = call_arguments(&json!({})).unwrap_err();
        assert!(matches!(err, SynthesisError::EmptyArguments));
    }

    #[test]
    fn test_synthesized_program_carries_adapter_commands() {
        let adapter = LanguageAdapter::for_language("python").unwrap();
        let program = synthesize(
            &adapter,
            "class Solution:\n    def twoSum(self, nums, target):\n        return []",
            &json!({"nums": [2, 7], "target": 9}),
        )
        .unwrap();

        assert_eq!(program.language, "python");
        assert_eq!(program.source_file, "solution.py");
        assert!(program.compile_command.is_none());
        assert_eq!(program.run_command, vec!["python3", "solution.py"]);
        assert!(program.source.contains("class Solution:"));
        // The argument vector rides along as an escaped string literal.
        assert!(program.source.contains("\"[[2,7],9]\""));
    }

    #[test]
    fn test_malicious_input_strings_stay_data() {
        let adapter = LanguageAdapter::for_language("javascript").unwrap();
        let program = synthesize(
            &adapter,
            "class Solution { echo(s) { return s; } }",
            &json!("\"); process.exit(1); (\""),
        )
        .unwrap();

        // The quote characters arrive escaped inside a string literal, so
        // they cannot terminate the driver's JSON.parse call.
        assert!(!program.source.contains("JSON.parse(\"\");"));
    }
}

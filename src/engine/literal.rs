//! Shared literal grammar
//!
//! Inputs and expected values are language-agnostic literals: JSON values,
//! with one documented extension. Bare boolean words in any casing
//! (`true`/`True`/`TRUE`) parse as booleans. Callers may send a literal
//! either as a JSON value or as a string containing the literal's text;
//! `resolve` handles both.

use serde_json::Value;

/// Parse literal text into a value. Returns `None` when the text is not a
/// valid literal, in which case callers fall back to raw string handling.
pub fn parse(text: &str) -> Option<Value> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.eq_ignore_ascii_case("true") {
        return Some(Value::Bool(true));
    }
    if trimmed.eq_ignore_ascii_case("false") {
        return Some(Value::Bool(false));
    }
    serde_json::from_str(trimmed).ok()
}

/// Resolve a request-level literal: strings are parsed as literal text
/// (falling back to the trimmed string itself), anything else is already a
/// structured value.
pub fn resolve(value: &Value) -> Value {
    match value {
        Value::String(s) => parse(s).unwrap_or_else(|| Value::String(s.trim().to_string())),
        other => other.clone(),
    }
}

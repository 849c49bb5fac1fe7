//! Output Normalizer & Comparator
//!
//! Canonicalizes the captured stdout and the caller's expected literal into
//! a common form and decides equality. Pure; no side effects.
//!
//! Rules: both sides parse through the shared literal grammar, falling back
//! to trimmed-string handling when parsing fails. Booleans normalize
//! case-insensitively (including string leaves spelling a boolean inside
//! nested structures). Numbers compare by value, lists element-wise in
//! order (as multisets for order-insensitive adapters), mappings by key set
//! with key order irrelevant, all recursively.

use serde_json::Value;

use super::literal;

/// Comparison outcome plus both canonical forms for diagnostics
#[derive(Debug)]
pub struct Comparison {
    pub matches: bool,
    pub actual: Value,
    pub expected: Value,
}

/// Compare captured stdout against the expected literal.
pub fn compare(actual_stdout: &str, expected: &Value, order_insensitive: bool) -> Comparison {
    let actual = canonicalize(
        literal::parse(actual_stdout)
            .unwrap_or_else(|| Value::String(actual_stdout.trim().to_string())),
    );
    let expected = canonicalize(literal::resolve(expected));

    let matches = values_equal(&actual, &expected, order_insensitive);

    Comparison {
        matches,
        actual,
        expected,
    }
}

/// Normalize boolean spellings recursively.
fn canonicalize(value: Value) -> Value {
    match value {
        Value::String(s) => {
            if s.eq_ignore_ascii_case("true") {
                Value::Bool(true)
            } else if s.eq_ignore_ascii_case("false") {
                Value::Bool(false)
            } else {
                Value::String(s)
            }
        }
        Value::Array(items) => Value::Array(items.into_iter().map(canonicalize).collect()),
        Value::Object(map) => {
            Value::Object(map.into_iter().map(|(k, v)| (k, canonicalize(v))).collect())
        }
        other => other,
    }
}

/// Recursive structural equality over canonical forms.
fn values_equal(a: &Value, b: &Value, order_insensitive: bool) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => numbers_equal(x, y),
        (Value::Array(xs), Value::Array(ys)) => {
            if xs.len() != ys.len() {
                return false;
            }
            if order_insensitive {
                multiset_equal(xs, ys)
            } else {
                xs.iter()
                    .zip(ys)
                    .all(|(x, y)| values_equal(x, y, order_insensitive))
            }
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs.iter().all(|(key, x)| {
                    ys.get(key)
                        .is_some_and(|y| values_equal(x, y, order_insensitive))
                })
        }
        _ => a == b,
    }
}

/// Numeric value equality: `1` equals `1.0`. Integers compare exactly when
/// both sides are integral; mixed forms go through f64.
fn numbers_equal(x: &serde_json::Number, y: &serde_json::Number) -> bool {
    if let (Some(a), Some(b)) = (x.as_i64(), y.as_i64()) {
        return a == b;
    }
    if let (Some(a), Some(b)) = (x.as_u64(), y.as_u64()) {
        return a == b;
    }
    match (x.as_f64(), y.as_f64()) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// Order-insensitive list equality: greedy pairwise matching.
fn multiset_equal(xs: &[Value], ys: &[Value]) -> bool {
    let mut remaining: Vec<&Value> = ys.iter().collect();
    for x in xs {
        let Some(pos) = remaining.iter().position(|y| values_equal(x, y, true)) else {
            return false;
        };
        remaining.swap_remove(pos);
    }
    true
}

//! Python language adapter

use super::LanguageAdapter;

/// Get the adapter for Python
pub fn adapter() -> LanguageAdapter {
    LanguageAdapter {
        language: "python",
        source_file: "solution.py",
        compile_command: None,
        run_command: &["python3", "solution.py"],
        synthesize_driver,
        order_insensitive: false,
    }
}

/// Wrap a submission with the Python driver.
///
/// The driver instantiates `Solution`, calls its first defined public
/// method with the deserialized argument vector, and prints the result as
/// a JSON literal. A `None` return with at least one argument means the
/// submission mutated its first argument in place, so that argument is
/// serialized instead.
fn synthesize_driver(code: &str, args_literal: &str) -> String {
    format!(
        r#"{code}

import json as __duel_json
import sys as __duel_sys


def __duel_main():
    args = __duel_json.loads({args_literal})
    sol = Solution()
    methods = [
        name
        for name, member in vars(type(sol)).items()
        if not name.startswith("_") and callable(member)
    ]
    if not methods:
        raise RuntimeError("Solution defines no public method")
    result = getattr(sol, methods[0])(*args)
    if result is None and args:
        result = args[0]
    __duel_sys.stdout.write(__duel_json.dumps(result))


__duel_main()
"#
    )
}

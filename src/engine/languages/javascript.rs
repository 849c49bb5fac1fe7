//! JavaScript (Node.js) language adapter

use super::LanguageAdapter;

/// Get the adapter for JavaScript
pub fn adapter() -> LanguageAdapter {
    LanguageAdapter {
        language: "javascript",
        source_file: "solution.js",
        compile_command: None,
        run_command: &["node", "solution.js"],
        synthesize_driver,
        order_insensitive: false,
    }
}

/// Driver template; `__DUEL_ARGS__` is replaced with the argument vector
/// rendered as a JSON string literal. An `undefined` return with at least
/// one argument means the submission mutated its first argument in place.
const DRIVER: &str = r#"
(function () {
    "use strict";
    const args = JSON.parse(__DUEL_ARGS__);
    const sol = new Solution();
    const names = Object.getOwnPropertyNames(Object.getPrototypeOf(sol))
        .filter((n) => n !== "constructor" && typeof sol[n] === "function");
    if (names.length === 0) {
        throw new Error("Solution defines no public method");
    }
    let result = sol[names[0]](...args);
    if (result === undefined && args.length > 0) {
        result = args[0];
    }
    process.stdout.write(JSON.stringify(result === undefined ? null : result));
})();
"#;

fn synthesize_driver(code: &str, args_literal: &str) -> String {
    let driver = DRIVER.replace("__DUEL_ARGS__", args_literal);
    format!("{code}\n{driver}")
}

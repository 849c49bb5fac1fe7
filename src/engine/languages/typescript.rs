//! TypeScript language adapter
//!
//! TypeScript is the one statically-checked language in the registry: the
//! compile step runs `tsc`, and its diagnostics surface as a compile-error
//! verdict. The emitted JavaScript then runs under Node like the JavaScript
//! adapter's output.

use super::LanguageAdapter;

/// Get the adapter for TypeScript
pub fn adapter() -> LanguageAdapter {
    LanguageAdapter {
        language: "typescript",
        source_file: "solution.ts",
        compile_command: Some(&[
            "tsc",
            "--target",
            "es2020",
            "--module",
            "commonjs",
            "--lib",
            "es2020",
            "solution.ts",
        ]),
        run_command: &["node", "solution.js"],
        synthesize_driver,
        order_insensitive: false,
    }
}

/// Driver template; `__DUEL_ARGS__` is replaced with the argument vector
/// rendered as a JSON string literal. The driver goes through `any` so the
/// typechecker constrains the submission, not the harness.
const DRIVER: &str = r#"
declare const process: any;

(() => {
    const args: any[] = JSON.parse(__DUEL_ARGS__);
    const sol: any = new (Solution as any)();
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adapter_compiles_then_runs_emitted_js() {
        let adapter = adapter();
        assert_eq!(adapter.source_file(), "solution.ts");
        assert_eq!(adapter.compile_command().unwrap()[0], "tsc");
        assert_eq!(adapter.run_command(), &["node", "solution.js"]);
    }

    #[test]
    fn test_driver_embeds_arguments() {
        let program = synthesize_driver(
            "class Solution {\n    reverseString(s: string[]): void {}\n}",
            "\"[[\\\"h\\\",\\\"e\\\"]]\"",
        );
        assert!(program.contains("JSON.parse(\"[[\\\"h\\\",\\\"e\\\"]]\")"));
    }
}

//! Language Adapter Registry
//!
//! Per-language descriptors for how to wrap, compile (if needed), and invoke
//! a submission. Adapters are plain data bundles; adding a language means
//! adding a module with an `adapter()` constructor and one match arm here.

pub mod javascript;
pub mod python;
pub mod typescript;

use crate::{
    constants::languages,
    error::{AppError, AppResult},
};

/// Per-language adapter describing the entry-point convention, the compile
/// step (identity for interpreted languages), and driver synthesis.
///
/// The entry-point contract shared by all adapters: the submission defines a
/// `Solution` class, and the synthesized driver invokes its first defined
/// public method. Read-only, shared across requests.
#[derive(Debug, Clone)]
pub struct LanguageAdapter {
    language: &'static str,
    source_file: &'static str,
    compile_command: Option<&'static [&'static str]>,
    run_command: &'static [&'static str],
    /// Produces the full runnable program from the submission source and the
    /// call-argument vector rendered as a JSON string literal
    synthesize_driver: fn(code: &str, args_literal: &str) -> String,
    /// When set, list outputs compare as multisets instead of sequences
    order_insensitive: bool,
}

impl LanguageAdapter {
    /// Resolve the adapter for a language identifier.
    ///
    /// Lookup is case-insensitive and ignores surrounding whitespace.
    /// Pure; no side effects.
    pub fn for_language(language: &str) -> AppResult<Self> {
        match language.trim().to_ascii_lowercase().as_str() {
            languages::PYTHON => Ok(python::adapter()),
            languages::JAVASCRIPT => Ok(javascript::adapter()),
            languages::TYPESCRIPT => Ok(typescript::adapter()),
            _ => Err(AppError::UnsupportedLanguage(format!(
                "{}. Supported languages: {:?}",
                language.trim(),
                languages::ALL
            ))),
        }
    }

    /// Canonical language identifier
    pub fn language(&self) -> &'static str {
        self.language
    }

    /// Name of the source file the synthesized program is written to
    pub fn source_file(&self) -> &'static str {
        self.source_file
    }

    /// Compile command, if the language has a compile step
    pub fn compile_command(&self) -> Option<&'static [&'static str]> {
        self.compile_command
    }

    /// Command that runs the (compiled) program
    pub fn run_command(&self) -> &'static [&'static str] {
        self.run_command
    }

    /// Generate the runnable program text for a submission
    pub fn synthesize_driver(&self, code: &str, args_literal: &str) -> String {
        (self.synthesize_driver)(code, args_literal)
    }

    /// Whether list outputs for this adapter compare order-insensitively
    pub fn order_insensitive(&self) -> bool {
        self.order_insensitive
    }
}

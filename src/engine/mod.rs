//! Code execution and grading engine
//!
//! One request flows strictly forward through the pipeline:
//!
//! 1. `languages`: adapter lookup (what to run, how to wrap it)
//! 2. `synthesis`: submission + generated driver = runnable program
//! 3. `sandbox`: isolated, resource-limited execution
//! 4. `compare`: canonicalize and match actual vs. expected output
//! 5. `verdict`: final structured result
//!
//! `orchestrator` drives the sequence per request under one deadline, with
//! a bounded sandbox pool. The only state shared between requests is the
//! read-only adapter configuration and the pool itself.

pub mod compare;
pub mod languages;
pub mod literal;
pub mod orchestrator;
pub mod sandbox;
pub mod synthesis;
pub mod verdict;

pub use languages::LanguageAdapter;
pub use orchestrator::ExecutionEngine;
pub use sandbox::{CompletionCause, SandboxResult};
pub use synthesis::{SynthesisError, SynthesizedProgram};

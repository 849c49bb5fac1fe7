//! Domain models

pub mod execution;

pub use execution::{ExecutionRequest, ExecutionResult};

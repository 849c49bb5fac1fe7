//! Request Orchestrator
//!
//! Per-request coordinator: resolves the adapter, synthesizes the program,
//! drives the sandbox, compares output, and assembles the verdict under one
//! overall deadline. Every admitted request yields exactly one result;
//! submission-caused failures become failing verdicts, only request
//! malformation and infrastructure faults become `AppError`s.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::Instrument;
use uuid::Uuid;

use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::{ExecutionRequest, ExecutionResult},
};

use super::{
    compare,
    languages::LanguageAdapter,
    sandbox::{self, CompletionCause, SandboxLimits, SandboxOutcome},
    synthesis, verdict,
};

/// The execution engine shared by all requests.
///
/// Holds only read-only configuration and the two admission primitives:
/// a FIFO semaphore bounding simultaneously executing sandboxes and an
/// outer permit budget bounding slot waiters. Requests beyond the budget
/// fail fast with a capacity error instead of queueing unboundedly.
#[derive(Clone)]
pub struct ExecutionEngine {
    inner: Arc<EngineInner>,
}

struct EngineInner {
    config: Config,
    /// Sandbox slots; `acquire` wakes waiters in FIFO order
    slots: Semaphore,
    /// Slots + queue depth; exhaustion means fail fast
    admission: Semaphore,
}

impl ExecutionEngine {
    /// Create a new engine from configuration.
    pub fn new(config: Config) -> Self {
        let max_concurrent = config.engine.max_concurrent;
        let max_queue_depth = config.engine.max_queue_depth;

        Self {
            inner: Arc::new(EngineInner {
                config,
                slots: Semaphore::new(max_concurrent),
                admission: Semaphore::new(max_concurrent + max_queue_depth),
            }),
        }
    }

    /// Execute one grading request end to end.
    pub async fn execute(&self, request: ExecutionRequest) -> AppResult<ExecutionResult> {
        let request_id = Uuid::new_v4();
        let span = tracing::info_span!(
            "execute_request",
            %request_id,
            language = %request.language,
        );

        async move {
            // Resolving: unknown languages never reach the sandbox.
            let adapter = LanguageAdapter::for_language(&request.language)?;

            let _admission = self
                .inner
                .admission
                .try_acquire()
                .map_err(|_| AppError::CapacityExceeded)?;

            let deadline = self.inner.config.engine.request_deadline();
            let result =
                match tokio::time::timeout(deadline, self.run_pipeline(&adapter, &request)).await
                {
                    Ok(result) => result?,
                    // Deadline breach reads the same as a sandbox timeout.
                    // Dropping the pipeline future kills the child and
                    // removes the scratch dir.
                    Err(_) => verdict::deadline_exceeded(deadline),
                };

            tracing::info!(
                passed = result.passed,
                execution_time_ms = result.execution_time_ms,
                "request judged"
            );

            Ok(result)
        }
        .instrument(span)
        .await
    }

    /// Synthesizing → Executing → Comparing. Infallible with respect to the
    /// submission: its failures come back as data.
    async fn run_pipeline(
        &self,
        adapter: &LanguageAdapter,
        request: &ExecutionRequest,
    ) -> AppResult<ExecutionResult> {
        let program = match synthesis::synthesize(adapter, &request.code, &request.input) {
            Ok(program) => program,
            Err(e) => {
                tracing::debug!(error = %e, "synthesis failed");
                return Ok(verdict::from_synthesis_error(&e));
            }
        };

        let _slot = self
            .inner
            .slots
            .acquire()
            .await
            .map_err(|_| AppError::Sandbox("sandbox pool closed".to_string()))?;

        let limits = SandboxLimits::from_config(&self.inner.config.sandbox);
        let outcome = sandbox::execute(&program, &limits).await?;

        let result = match outcome {
            SandboxOutcome::CompileFailed(r) => verdict::from_compile_failure(&r),
            SandboxOutcome::Finished(r) if r.cause == CompletionCause::Completed => {
                if r.stdout_truncated {
                    verdict::from_truncated_output(&r)
                } else {
                    let comparison = compare::compare(
                        &r.stdout,
                        &request.expected,
                        adapter.order_insensitive(),
                    );
                    verdict::from_comparison(comparison, r.duration)
                }
            }
            SandboxOutcome::Finished(r) => verdict::from_sandbox_failure(&r),
        };

        Ok(result)
    }
}

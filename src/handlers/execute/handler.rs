//! Execute-code handler implementation

use axum::{Json, extract::State};
use validator::Validate;

use crate::{
    error::AppResult,
    models::ExecutionRequest,
    state::AppState,
};

use super::{request::ExecuteCodeRequest, response::ExecuteCodeResponse};

/// Execute a submission and grade its output.
///
/// Submission-caused failures (synthesis, compile, runtime, timeout,
/// mismatch) come back as `passed: false` with HTTP 200; only malformed
/// requests and service-internal faults produce error statuses.
pub async fn execute_code(
    State(state): State<AppState>,
    Json(payload): Json<ExecuteCodeRequest>,
) -> AppResult<Json<ExecuteCodeResponse>> {
    payload.validate()?;

    let request = ExecutionRequest {
        code: payload.code,
        language: payload.language,
        input: payload.input,
        expected: payload.expected,
    };

    let result = state.engine().execute(request).await?;

    Ok(Json(ExecuteCodeResponse::from(result)))
}

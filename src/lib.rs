//! Duelbox - Multi-Language Sandboxed Code Execution and Grading Engine
//!
//! This library provides the core functionality for the Duelbox service:
//! it accepts untrusted submissions in several languages, executes them
//! against a caller-supplied input under strict isolation and resource
//! limits, and grades the output against an expected value.
//!
//! # Features
//!
//! - Multi-language support (Python, JavaScript, TypeScript)
//! - Process-level sandboxing with rlimits, scratch dirs, and hard deadlines
//! - Language-agnostic output normalization and comparison
//! - Bounded concurrency with fail-fast admission control
//!
//! # Architecture
//!
//! The application follows a layered architecture:
//! - **Handlers**: HTTP request handlers (thin layer)
//! - **Engine**: the grading pipeline (adapters → synthesis → sandbox →
//!   comparison → verdict) behind one orchestrator
//! - **Models**: domain models and DTOs

use std::time::Duration;

use axum::Router;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod state;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, AppResult};
pub use state::AppState;

/// Build the full application router, layers included. Shared by `main`
/// and the integration tests.
pub fn app(state: AppState) -> Router {
    let http_timeout = Duration::from_secs(state.config().server.http_timeout_seconds);

    Router::new()
        .merge(handlers::routes(&state))
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(
            middleware::logging::logging_middleware,
        ))
        .layer(TimeoutLayer::new(http_timeout))
        .layer(RequestBodyLimitLayer::new(constants::MAX_REQUEST_BODY_BYTES))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

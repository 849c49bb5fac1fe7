//! HTTP Request Handlers
//!
//! This module contains all HTTP request handlers organized by domain.

pub mod execute;
pub mod health;

use axum::{Router, middleware};

use crate::{middleware::auth::auth_middleware, state::AppState};

/// Create all API routes
pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new().merge(health::routes()).merge(
        execute::routes()
            .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware)),
    )
}

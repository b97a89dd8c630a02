//! Route registration.

mod features;
mod health;

use crate::middleware::log_requests;
use crate::state::AppState;
use axum::routing::get;
use axum::{middleware, Router};

/// Builds the complete application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health::health))
        .nest("/api/features", features::routes(state))
        .layer(middleware::from_fn(log_requests))
}

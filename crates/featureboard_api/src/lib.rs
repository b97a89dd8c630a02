//! HTTP surface for FeatureBoard.
//!
//! # Responsibility
//! - Map each REST endpoint onto `FeatureService` use-cases.
//! - Translate validation, not-found and storage failures into status codes.
//!
//! # Invariants
//! - Every failure body is `{"error": "<short message>"}`.
//! - Storage error details are logged, never sent to clients.

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::{ApiError, Operation, ServerError};
pub use routes::router;
pub use server::{run, serve};
pub use state::AppState;

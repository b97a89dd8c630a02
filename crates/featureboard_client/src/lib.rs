//! Typed HTTP client for the FeatureBoard API.
//!
//! # Responsibility
//! - Wrap each endpoint in one async method returning core model types.
//! - Surface the server's `error` message when a request fails.
//!
//! # Invariants
//! - No retries, no caching; every call is one request.

mod client;
mod error;
mod types;

pub use client::FeatureBoardClient;
pub use error::{ClientError, ClientResult};
pub use featureboard_core::{Feature, FeatureId, FeatureStats, FeatureStatus, StatusCounts};
pub use types::{
    CreateFeatureRequest, DeleteResponse, FeatureFilter, HealthResponse, UpdateFeatureRequest,
};

//! Core domain logic for FeatureBoard.
//! This crate is the single source of truth for feature invariants.
//!
//! The `store` feature (on by default) adds SQLite storage and logging; the
//! model and validation layer build without it.

#[cfg(feature = "store")]
pub mod db;
#[cfg(feature = "store")]
pub mod logging;
pub mod model;
#[cfg(feature = "store")]
pub mod repo;
#[cfg(feature = "store")]
pub mod service;

#[cfg(feature = "store")]
pub use logging::{default_log_level, init_logging, logging_status, LogDestination};
pub use model::feature::{
    Feature, FeatureId, FeatureListQuery, FeaturePatch, FeatureStats, FeatureStatus, NewFeature,
    StatusCounts, DEFAULT_MODULE, DEFAULT_PRIORITY, MAX_PRIORITY, MIN_PRIORITY,
};
pub use model::input::{CreateFeatureInput, UpdateFeatureInput};
pub use model::validation::{
    is_valid_priority, is_valid_status, validate_create, validate_list_filters, validate_update,
    ValidationError,
};
#[cfg(feature = "store")]
pub use repo::feature_repo::{FeatureRepository, RepoError, RepoResult, SqliteFeatureRepository};
#[cfg(feature = "store")]
pub use service::feature_service::{FeatureService, FeatureServiceError, FeatureServiceResult};

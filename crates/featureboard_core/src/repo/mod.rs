//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository writes accept only validated shapes (`NewFeature`, `FeaturePatch`).
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.

pub mod feature_repo;

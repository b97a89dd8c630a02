//! Domain model for the feature board.
//!
//! # Responsibility
//! - Define the canonical `Feature` record and its status/priority domains.
//! - Define raw request inputs and the validated shapes the repository accepts.
//!
//! # Invariants
//! - Every stored feature is identified by a database-assigned `FeatureId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod feature;
pub mod input;
pub mod validation;

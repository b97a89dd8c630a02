//! Feature domain model.
//!
//! # Responsibility
//! - Define the canonical feature record exchanged over the API.
//! - Define validated create/update shapes consumed by the repository.
//!
//! # Invariants
//! - `status` is always one of `todo|doing|done`.
//! - `priority` is always within `MIN_PRIORITY..=MAX_PRIORITY`.
//! - `updated_at` is never earlier than `created_at`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

/// Database-assigned feature identifier. Never reused within a store.
pub type FeatureId = i64;

/// Module label applied when a feature does not name one.
pub const DEFAULT_MODULE: &str = "other";
/// Priority applied when a feature does not name one.
pub const DEFAULT_PRIORITY: u8 = 3;
pub const MIN_PRIORITY: u8 = 1;
pub const MAX_PRIORITY: u8 = 5;

/// Workflow stage of a feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureStatus {
    /// Not started.
    #[default]
    Todo,
    /// Work is in progress.
    Doing,
    /// Completed.
    Done,
}

impl FeatureStatus {
    /// Every status, in workflow order.
    pub const ALL: [FeatureStatus; 3] = [Self::Todo, Self::Doing, Self::Done];

    /// Stable lowercase literal used in storage, queries and JSON.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::Doing => "doing",
            Self::Done => "done",
        }
    }

    /// Parses an exact, case-sensitive status literal.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "todo" => Some(Self::Todo),
            "doing" => Some(Self::Doing),
            "done" => Some(Self::Done),
            _ => None,
        }
    }
}

impl Display for FeatureStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical stored feature record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feature {
    pub id: FeatureId,
    /// Trimmed, never empty.
    pub title: String,
    pub description: Option<String>,
    /// Free-text grouping label.
    pub module: String,
    pub status: FeatureStatus,
    /// 1 (low) to 5 (high).
    pub priority: u8,
    /// ISO-8601 UTC with millisecond precision, set once at insert.
    pub created_at: String,
    /// ISO-8601 UTC with millisecond precision, refreshed on every update.
    pub updated_at: String,
}

/// Validated input for inserting a feature, with defaults already applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFeature {
    pub title: String,
    pub description: Option<String>,
    pub module: String,
    pub status: FeatureStatus,
    pub priority: u8,
}

impl NewFeature {
    /// Builds an insert shape with every optional field defaulted.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            module: DEFAULT_MODULE.to_string(),
            status: FeatureStatus::default(),
            priority: DEFAULT_PRIORITY,
        }
    }
}

/// Validated sparse update. `None` means "leave unchanged".
///
/// `description` is doubly optional: `Some(None)` clears the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeaturePatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub module: Option<String>,
    pub status: Option<FeatureStatus>,
    pub priority: Option<u8>,
}

impl FeaturePatch {
    /// Returns whether the patch carries no field at all.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.module.is_none()
            && self.status.is_none()
            && self.priority.is_none()
    }
}

/// Filters for listing features. Provided filters are combined with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureListQuery {
    pub status: Option<FeatureStatus>,
    /// Exact match on the module label.
    pub module: Option<String>,
}

/// Per-status counts; always reports all three statuses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub todo: u64,
    pub doing: u64,
    pub done: u64,
}

impl StatusCounts {
    /// Sets the count for one status.
    pub fn set(&mut self, status: FeatureStatus, count: u64) {
        match status {
            FeatureStatus::Todo => self.todo = count,
            FeatureStatus::Doing => self.doing = count,
            FeatureStatus::Done => self.done = count,
        }
    }

    /// Sum over all statuses.
    pub fn total(&self) -> u64 {
        self.todo + self.doing + self.done
    }
}

/// Aggregate counts over the whole board.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureStats {
    pub by_status: StatusCounts,
    /// Only modules holding at least one feature.
    pub by_module: BTreeMap<String, u64>,
}

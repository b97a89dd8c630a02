//! Feature use-case service.
//!
//! # Responsibility
//! - Provide list/get/create/update/delete/stats entry points for callers.
//! - Run input validation before any repository mutation.
//!
//! # Invariants
//! - A validation failure never reaches the repository.
//! - Update reports not-found before judging the body, so a missing id is
//!   not-found regardless of what was sent.

use crate::model::feature::{Feature, FeatureId, FeatureListQuery, FeatureStats};
use crate::model::input::{CreateFeatureInput, UpdateFeatureInput};
use crate::model::validation::{validate_create, validate_update, ValidationError};
use crate::repo::feature_repo::{FeatureRepository, RepoError};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for feature use-cases.
#[derive(Debug)]
pub enum FeatureServiceError {
    /// Input rejected by the validation layer.
    Validation(ValidationError),
    /// Target feature does not exist.
    NotFound(FeatureId),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for FeatureServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "feature not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for FeatureServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound(_) => None,
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<ValidationError> for FeatureServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for FeatureServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NotFound(id),
            other => Self::Repo(other),
        }
    }
}

pub type FeatureServiceResult<T> = Result<T, FeatureServiceError>;

/// Feature service facade over repository implementations.
pub struct FeatureService<R: FeatureRepository> {
    repo: R,
}

impl<R: FeatureRepository> FeatureService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists features matching every provided filter.
    pub fn list(&self, query: &FeatureListQuery) -> FeatureServiceResult<Vec<Feature>> {
        Ok(self.repo.list_features(query)?)
    }

    /// Gets one feature or reports not-found.
    pub fn get(&self, id: FeatureId) -> FeatureServiceResult<Feature> {
        self.repo
            .get_feature(id)?
            .ok_or(FeatureServiceError::NotFound(id))
    }

    /// Validates and inserts a feature, returning the stored record.
    pub fn create(&self, input: CreateFeatureInput) -> FeatureServiceResult<Feature> {
        let feature = validate_create(input)?;
        Ok(self.repo.create_feature(&feature)?)
    }

    /// Applies a sparse update and returns the stored record.
    ///
    /// # Contract
    /// - Not-found wins over validation errors.
    /// - An input with no fields returns the record unchanged.
    pub fn update(
        &self,
        id: FeatureId,
        input: UpdateFeatureInput,
    ) -> FeatureServiceResult<Feature> {
        if self.repo.get_feature(id)?.is_none() {
            return Err(FeatureServiceError::NotFound(id));
        }
        let patch = validate_update(input)?;
        Ok(self.repo.update_feature(id, &patch)?)
    }

    /// Hard-deletes a feature.
    pub fn delete(&self, id: FeatureId) -> FeatureServiceResult<()> {
        Ok(self.repo.delete_feature(id)?)
    }

    /// Returns per-status and per-module counts.
    pub fn stats(&self) -> FeatureServiceResult<FeatureStats> {
        Ok(self.repo.feature_stats()?)
    }
}

//! Validation layer for feature inputs.
//!
//! # Responsibility
//! - Check field types, status enum membership and priority range.
//! - Turn raw inputs into validated `NewFeature`/`FeaturePatch` values.
//!
//! # Invariants
//! - Pure functions; nothing here touches storage.
//! - A failure rejects the whole input, so callers never write partially.

use crate::model::feature::{
    FeatureListQuery, FeaturePatch, FeatureStatus, NewFeature, DEFAULT_MODULE, DEFAULT_PRIORITY,
    MAX_PRIORITY, MIN_PRIORITY,
};
use crate::model::input::{CreateFeatureInput, UpdateFeatureInput};
use serde_json::{Number, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Semantic input error. `Display` is safe to show to API clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Create request without a usable title.
    MissingTitle,
    /// Update request with a blank or `null` title.
    EmptyTitle,
    InvalidStatus,
    InvalidPriority,
    /// Module that is not a string (or `null` on update).
    InvalidModule,
    /// Description that is neither a string nor `null`.
    InvalidDescription,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingTitle => f.write_str("Title is required and must be a non-empty string"),
            Self::EmptyTitle => f.write_str("Title must be a non-empty string"),
            Self::InvalidStatus => {
                f.write_str("Invalid status. Must be one of: todo, doing, done")
            }
            Self::InvalidPriority => f.write_str("Priority must be an integer between 1 and 5"),
            Self::InvalidModule => f.write_str("Module must be a string"),
            Self::InvalidDescription => f.write_str("Description must be a string or null"),
        }
    }
}

impl Error for ValidationError {}

/// Returns whether `value` is exactly one of the status literals.
pub fn is_valid_status(value: &str) -> bool {
    FeatureStatus::parse(value).is_some()
}

/// Returns whether `value` is an integral number within 1..=5.
///
/// `3.0` counts as integral; `2.5` does not.
pub fn is_valid_priority(value: &Number) -> bool {
    parse_priority(value).is_some()
}

/// Validates a create request and applies defaults for omitted fields.
///
/// Checks run in order title, status, priority, description, module; the
/// first failure wins.
pub fn validate_create(input: CreateFeatureInput) -> Result<NewFeature, ValidationError> {
    let title = input
        .title
        .as_ref()
        .and_then(non_blank_title)
        .ok_or(ValidationError::MissingTitle)?;

    let status = match input.status {
        None => FeatureStatus::default(),
        Some(raw) => status_field(&raw)?,
    };

    let priority = match input.priority {
        None => DEFAULT_PRIORITY,
        Some(raw) => priority_field(&raw)?,
    };

    let description = match input.description {
        None => None,
        Some(raw) => description_field(raw)?,
    };

    let module = match input.module {
        None | Some(Value::Null) => DEFAULT_MODULE.to_string(),
        Some(Value::String(raw)) => normalize_module(&raw),
        Some(_) => return Err(ValidationError::InvalidModule),
    };

    Ok(NewFeature {
        title,
        description,
        module,
        status,
        priority,
    })
}

/// Validates an update request into a sparse patch.
///
/// Absent fields stay absent; an empty input yields an empty patch.
pub fn validate_update(input: UpdateFeatureInput) -> Result<FeaturePatch, ValidationError> {
    let title = match input.title {
        None => None,
        Some(raw) => Some(non_blank_title(&raw).ok_or(ValidationError::EmptyTitle)?),
    };

    let status = input.status.as_ref().map(status_field).transpose()?;
    let priority = input.priority.as_ref().map(priority_field).transpose()?;
    let description = input.description.map(description_field).transpose()?;

    let module = match input.module {
        None => None,
        Some(Value::String(raw)) => Some(normalize_module(&raw)),
        Some(_) => return Err(ValidationError::InvalidModule),
    };

    Ok(FeaturePatch {
        title,
        description,
        module,
        status,
        priority,
    })
}

/// Builds list filters from raw query parameters.
///
/// Empty values count as absent. The module filter is an exact match and is
/// not normalized.
pub fn validate_list_filters(
    status: Option<&str>,
    module: Option<&str>,
) -> Result<FeatureListQuery, ValidationError> {
    let status = match status.filter(|value| !value.is_empty()) {
        None => None,
        Some(raw) => Some(FeatureStatus::parse(raw).ok_or(ValidationError::InvalidStatus)?),
    };

    Ok(FeatureListQuery {
        status,
        module: module
            .filter(|value| !value.is_empty())
            .map(str::to_string),
    })
}

/// Trims a module label, falling back to the default for blank labels.
pub fn normalize_module(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        DEFAULT_MODULE.to_string()
    } else {
        trimmed.to_string()
    }
}

fn non_blank_title(raw: &Value) -> Option<String> {
    let trimmed = raw.as_str()?.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn status_field(raw: &Value) -> Result<FeatureStatus, ValidationError> {
    raw.as_str()
        .and_then(FeatureStatus::parse)
        .ok_or(ValidationError::InvalidStatus)
}

fn priority_field(raw: &Value) -> Result<u8, ValidationError> {
    match raw {
        Value::Number(number) => parse_priority(number).ok_or(ValidationError::InvalidPriority),
        _ => Err(ValidationError::InvalidPriority),
    }
}

fn description_field(raw: Value) -> Result<Option<String>, ValidationError> {
    match raw {
        Value::Null => Ok(None),
        Value::String(text) => Ok(Some(text)),
        _ => Err(ValidationError::InvalidDescription),
    }
}

fn parse_priority(value: &Number) -> Option<u8> {
    let integral = if let Some(int) = value.as_i64() {
        int
    } else if value.is_u64() {
        // Larger than i64::MAX, so out of range anyway.
        return None;
    } else {
        let float = value.as_f64()?;
        let range = f64::from(MIN_PRIORITY)..=f64::from(MAX_PRIORITY);
        if float.fract() != 0.0 || !range.contains(&float) {
            return None;
        }
        float as i64
    };

    u8::try_from(integral)
        .ok()
        .filter(|priority| (MIN_PRIORITY..=MAX_PRIORITY).contains(priority))
}

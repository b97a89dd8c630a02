use featureboard_core::FeatureStatus;
use serde::{Deserialize, Serialize};

/// List filters. `None` and empty values are left out of the query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureFilter {
    pub status: Option<FeatureStatus>,
    pub module: Option<String>,
}

impl FeatureFilter {
    pub(crate) fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(status) = self.status {
            pairs.push(("status", status.as_str().to_string()));
        }
        if let Some(module) = self.module.as_deref().filter(|value| !value.is_empty()) {
            pairs.push(("module", module.to_string()));
        }
        pairs
    }
}

/// Body of `POST /api/features`. Omitted fields take server defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CreateFeatureRequest {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<FeatureStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u8>,
}

impl CreateFeatureRequest {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Body of `PUT /api/features/{id}`. Only `Some` fields are sent.
///
/// `description: Some(None)` sends `null` and clears the description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdateFeatureRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<FeatureStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeleteResponse {
    pub message: String,
}

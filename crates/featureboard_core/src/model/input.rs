//! Raw request inputs for feature create/update.
//!
//! # Responsibility
//! - Accept any JSON object as a request body.
//! - Keep "field absent" distinguishable from "field is `null`".
//!
//! # Invariants
//! - Only a JSON object parses; arrays, scalars and `null` bodies are
//!   rejected here, before any store access.
//! - Field values are unchecked JSON. Type and range checks belong to
//!   `validation`, so they run after the update existence check.
//! - Each field is `None` when absent and `Some(value)` otherwise, with
//!   `Some(Value::Null)` for an explicit `null`.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Body of a create request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateFeatureInput {
    pub title: Option<Value>,
    pub description: Option<Value>,
    pub module: Option<Value>,
    pub status: Option<Value>,
    pub priority: Option<Value>,
}

/// Body of an update request. Any subset of fields may be supplied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateFeatureInput {
    pub title: Option<Value>,
    pub description: Option<Value>,
    pub module: Option<Value>,
    pub status: Option<Value>,
    pub priority: Option<Value>,
}

impl From<Map<String, Value>> for CreateFeatureInput {
    fn from(mut fields: Map<String, Value>) -> Self {
        Self {
            title: fields.remove("title"),
            description: fields.remove("description"),
            module: fields.remove("module"),
            status: fields.remove("status"),
            priority: fields.remove("priority"),
        }
    }
}

impl From<Map<String, Value>> for UpdateFeatureInput {
    fn from(mut fields: Map<String, Value>) -> Self {
        Self {
            title: fields.remove("title"),
            description: fields.remove("description"),
            module: fields.remove("module"),
            status: fields.remove("status"),
            priority: fields.remove("priority"),
        }
    }
}

impl<'de> Deserialize<'de> for CreateFeatureInput {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        object_fields(deserializer).map(Self::from)
    }
}

impl<'de> Deserialize<'de> for UpdateFeatureInput {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        object_fields(deserializer).map(Self::from)
    }
}

// Objects only. Deserializing straight into `Map` also takes arrays and `null`.
fn object_fields<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Map<String, Value>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Object(fields) => Ok(fields),
        _ => Err(D::Error::custom("request body must be a JSON object")),
    }
}

//! API error type and its HTTP mapping.
//!
//! 400 for client input, 404 for missing records, 500 for everything the
//! store reports. 500 responses carry a fixed per-operation message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use featureboard_core::db::DbError;
use featureboard_core::logging::sanitize_message;
use featureboard_core::{FeatureServiceError, ValidationError};
use log::{debug, error};
use std::io;
use std::net::{AddrParseError, SocketAddr};
use std::path::PathBuf;
use thiserror::Error;

const MAX_LOGGED_ERROR_CHARS: usize = 300;

/// Public message for ids that are not integers.
pub const INVALID_ID_MESSAGE: &str = "Invalid feature ID";
/// Public message for bodies that are not the expected JSON object.
pub const INVALID_BODY_MESSAGE: &str = "Invalid JSON body";
/// Public message for query strings that cannot be decoded.
pub const INVALID_QUERY_MESSAGE: &str = "Invalid query parameters";
pub const NOT_FOUND_MESSAGE: &str = "Feature not found";

/// Endpoint-level operation, used for log events and 500 messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Stats,
    Get,
    Create,
    Update,
    Delete,
}

impl Operation {
    /// Log event name.
    pub fn event(self) -> &'static str {
        match self {
            Self::List => "feature_list",
            Self::Stats => "feature_stats",
            Self::Get => "feature_get",
            Self::Create => "feature_create",
            Self::Update => "feature_update",
            Self::Delete => "feature_delete",
        }
    }

    /// Client-facing message when the store fails.
    pub fn failure_message(self) -> &'static str {
        match self {
            Self::List => "Failed to fetch features",
            Self::Stats => "Failed to fetch statistics",
            Self::Get => "Failed to fetch feature",
            Self::Create => "Failed to create feature",
            Self::Update => "Failed to update feature",
            Self::Delete => "Failed to delete feature",
        }
    }
}

/// Error returned by every handler.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Malformed or semantically invalid input. HTTP 400.
    #[error("{0}")]
    BadRequest(String),

    /// Well-formed id without a record. HTTP 404.
    #[error("{0}")]
    NotFound(String),

    /// Storage or runtime failure. HTTP 500. Only `message` is public.
    #[error("{message}")]
    Internal {
        message: &'static str,
        detail: String,
    },
}

impl ApiError {
    /// Maps a service failure for `operation`, logging it at the boundary.
    pub fn from_service(operation: Operation, err: FeatureServiceError) -> Self {
        match err {
            FeatureServiceError::Validation(err) => {
                debug!(
                    "event={} module=api status=rejected reason={}",
                    operation.event(),
                    err
                );
                Self::from(err)
            }
            FeatureServiceError::NotFound(id) => {
                debug!(
                    "event={} module=api status=not_found id={}",
                    operation.event(),
                    id
                );
                Self::NotFound(NOT_FOUND_MESSAGE.to_string())
            }
            FeatureServiceError::Repo(err) => Self::internal(operation, err.to_string()),
        }
    }

    /// Builds a 500 for `operation`, logging `detail` server-side only.
    pub fn internal(operation: Operation, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        error!(
            "event={} module=api status=error error={}",
            operation.event(),
            sanitize_message(&detail, MAX_LOGGED_ERROR_CHARS)
        );
        Self::Internal {
            message: operation.failure_message(),
            detail,
        }
    }

    /// HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(value: ValidationError) -> Self {
        Self::BadRequest(value.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = serde_json::json!({ "error": self.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

/// Failure while starting or running the server.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("invalid listen address `{addr}`: {source}")]
    InvalidListenAddr {
        addr: String,
        #[source]
        source: AddrParseError,
    },

    #[error("cannot open database {}: {source}", path.display())]
    Database {
        path: PathBuf,
        #[source]
        source: DbError,
    },

    #[error("cannot bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[from] io::Error),
}

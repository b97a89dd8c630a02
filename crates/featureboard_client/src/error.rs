use thiserror::Error;

/// Client-side failure.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Server answered with a non-success status.
    ///
    /// `message` is the server's `error` string when present, otherwise
    /// `HTTP error <status>`.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// Transport or decoding failure.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid base url `{0}`")]
    InvalidBaseUrl(String),
}

impl ClientError {
    /// HTTP status of an `Api` error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

//! Server configuration.

use crate::error::ServerError;
use featureboard_core::db::{prepare_db_dir, DbResult};
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_LISTEN: &str = "127.0.0.1:3001";
pub const DEFAULT_DB_PATH: &str = "data/featureboard.db";

/// Runtime configuration for the HTTP server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Listen address, `host:port`.
    pub listen: String,
    /// SQLite database file.
    pub db_path: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: DEFAULT_LISTEN.to_string(),
            db_path: PathBuf::from(DEFAULT_DB_PATH),
        }
    }
}

impl ServerConfig {
    /// Parses the configured listen address.
    pub fn listen_addr(&self) -> Result<SocketAddr, ServerError> {
        self.listen
            .parse()
            .map_err(|source| ServerError::InvalidListenAddr {
                addr: self.listen.clone(),
                source,
            })
    }

    /// Creates the database file's parent directory when it is missing.
    pub fn ensure_db_dir(&self) -> DbResult<()> {
        prepare_db_dir(&self.db_path)
    }
}

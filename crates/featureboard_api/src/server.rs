//! HTTP server lifecycle.

use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::routes::router;
use crate::state::AppState;
use log::{error, info};
use std::future::Future;
use std::io;
use tokio::net::TcpListener;

/// Serves the API on an already-bound listener until `shutdown` resolves.
pub async fn serve(
    listener: TcpListener,
    state: AppState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> io::Result<()> {
    let addr = listener.local_addr()?;
    info!("event=server_start module=api status=ok addr={}", addr);

    let result = axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await;

    match &result {
        Ok(()) => info!("event=server_stop module=api status=ok addr={}", addr),
        Err(err) => error!(
            "event=server_stop module=api status=error addr={} error={}",
            addr, err
        ),
    }
    result
}

/// Opens the database named by `config`, binds its listen address and serves.
pub async fn run(
    config: &ServerConfig,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), ServerError> {
    let addr = config.listen_addr()?;
    let state = config
        .ensure_db_dir()
        .and_then(|()| AppState::open(&config.db_path))
        .map_err(|source| ServerError::Database {
            path: config.db_path.clone(),
            source,
        })?;
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;
    Ok(serve(listener, state, shutdown).await?)
}

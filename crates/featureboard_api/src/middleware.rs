//! Request logging middleware.

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use log::{debug, info, warn};
use std::time::Instant;

/// Logs one line per request with method, path, status and duration.
///
/// 5xx responses log at `warn`; health probes log at `debug` so they do not
/// flood the default `info` output.
pub async fn log_requests(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let started_at = Instant::now();

    let response = next.run(req).await;

    let status = response.status();
    let duration_ms = started_at.elapsed().as_millis();
    if status.is_server_error() {
        warn!(
            "event=http_request module=api method={} path={} status={} duration_ms={}",
            method,
            path,
            status.as_u16(),
            duration_ms
        );
    } else if path == "/api/health" {
        debug!(
            "event=http_request module=api method={} path={} status={} duration_ms={}",
            method,
            path,
            status.as_u16(),
            duration_ms
        );
    } else {
        info!(
            "event=http_request module=api method={} path={} status={} duration_ms={}",
            method,
            path,
            status.as_u16(),
            duration_ms
        );
    }

    response
}

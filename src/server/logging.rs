use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};

const LOG_TARGET: &str = "server::http";

/// Log every request with its status and latency. Server errors are logged at
/// warn so they stand out from routine traffic.
pub async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();

    tracing::debug!(target = LOG_TARGET, %method, %path, "incoming request");

    let start = Instant::now();
    let response = next.run(request).await;
    let duration_ms = start.elapsed().as_millis();
    let status = response.status();

    if status.is_server_error() {
        tracing::warn!(
            target = LOG_TARGET,
            %method,
            %path,
            status = %status.as_u16(),
            duration_ms = %duration_ms,
            "request failed"
        );
    } else {
        tracing::info!(
            target = LOG_TARGET,
            %method,
            %path,
            status = %status.as_u16(),
            duration_ms = %duration_ms,
            "request completed"
        );
    }

    response
}

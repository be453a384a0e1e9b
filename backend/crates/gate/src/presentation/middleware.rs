//! Gate Middleware
//!
//! Request logging: every request gets a short random id, logged with the
//! request line and client IP on the way in and the status and elapsed
//! time on the way out.

use axum::body::Body;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;
use platform::client::extract_client_ip;
use platform::crypto::random_hex_id;
use std::time::Instant;

pub async fn log_requests(req: Request<Body>, next: Next) -> Response {
    let request_id = random_hex_id(5);

    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    let query = req.uri().query().unwrap_or_default().to_owned();

    let direct_ip = req
        .extensions()
        .get::<axum::extract::ConnectInfo<std::net::SocketAddr>>()
        .map(|info| info.0.ip());
    let client_ip = extract_client_ip(req.headers(), direct_ip);

    tracing::info!(
        request_id = %request_id,
        client_ip = ?client_ip,
        method = %method,
        path = %path,
        query = %query,
        "Request received"
    );

    let started = Instant::now();
    let response = next.run(req).await;

    tracing::info!(
        request_id = %request_id,
        status = %response.status(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Request finished"
    );

    response
}

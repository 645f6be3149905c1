// src/middleware/request_size_limit.rs

use axum::{
    body::Body,
    extract::Request,
    http::{header::CONTENT_LENGTH, Method, StatusCode},
    middleware::Next,
    response::Response,
};
use tracing::warn;

/// Heartbeats are tiny; anything beyond this is rejected before the body is read.
pub const MAX_REQUEST_SIZE: usize = 64 * 1024;

/// Rejects POST/PUT/PATCH requests whose declared body exceeds
/// [`MAX_REQUEST_SIZE`] with 413.
pub async fn request_size_limit_middleware(
    request: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let method = request.method();
    if matches!(*method, Method::POST | Method::PUT | Method::PATCH) {
        let declared = request
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<usize>().ok());

        if let Some(length) = declared {
            if length > MAX_REQUEST_SIZE {
                warn!(
                    content_length = length,
                    max_size = MAX_REQUEST_SIZE,
                    method = %method,
                    path = %request.uri().path(),
                    "Request rejected: body size exceeds limit"
                );
                return Err(StatusCode::PAYLOAD_TOO_LARGE);
            }
        }
    }

    Ok(next.run(request).await)
}

//! Request timing middleware.
//!
//! Adds an `x-process-time` header with the handler duration in seconds.

use std::time::Instant;

use axum::{
    extract::Request,
    http::HeaderValue,
    middleware::Next,
    response::Response,
};

/// Measure handler duration and expose it as a response header
pub async fn process_time_middleware(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let mut response = next.run(request).await;

    let elapsed = start.elapsed().as_secs_f64();
    if let Ok(value) = HeaderValue::from_str(&format!("{:.6}", elapsed)) {
        response.headers_mut().insert("x-process-time", value);
    }

    response
}

//! Middleware for logging requests and responses.

use axum::{
    body::{Body, Bytes},
    extract::Request,
    http::{HeaderMap, StatusCode, header::CONTENT_TYPE},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// The number of bytes of a body logged at the `info` level.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If the body is longer than [LOG_BODY_LENGTH_LIMIT] bytes, it is
/// truncated and the full body is logged at the `debug` level.
/// Multipart request bodies and binary response bodies such as PDFs and
/// images are not logged, only their size.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let body_bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::warn!("Could not read request body: {error}");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    tracing::info!(
        "Received request: {parts:#?}\nbody: {}",
        describe_body(&parts.headers, &body_bytes)
    );
    log_full_body("request", &parts.headers, &body_bytes);

    let response = next
        .run(Request::from_parts(parts, Body::from(body_bytes)))
        .await;

    let (parts, body) = response.into_parts();
    let body_bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::error!("Could not read response body: {error}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    tracing::info!(
        "Sending response: {parts:#?}\nbody: {}",
        describe_body(&parts.headers, &body_bytes)
    );
    log_full_body("response", &parts.headers, &body_bytes);

    Response::from_parts(parts, Body::from(body_bytes))
}

/// Whether a body with these headers is text that is worth logging.
fn is_loggable(headers: &HeaderMap) -> bool {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    !(content_type.starts_with("multipart/")
        || content_type.starts_with("application/pdf")
        || content_type.starts_with("image/")
        || content_type.starts_with("application/octet-stream"))
}

/// A short description of a body for the `info` level log.
fn describe_body(headers: &HeaderMap, body: &Bytes) -> String {
    if !is_loggable(headers) {
        return format!("<{} bytes>", body.len());
    }

    let text = String::from_utf8_lossy(body);

    if text.len() > LOG_BODY_LENGTH_LIMIT {
        format!("{:?}...", truncate(&text, LOG_BODY_LENGTH_LIMIT))
    } else {
        format!("{text:?}")
    }
}

fn log_full_body(kind: &str, headers: &HeaderMap, body: &Bytes) {
    if body.len() > LOG_BODY_LENGTH_LIMIT && is_loggable(headers) {
        tracing::debug!("Full {kind} body: {:?}", String::from_utf8_lossy(body));
    }
}

/// The longest prefix of `text` that is at most `max_bytes` long and ends on a
/// character boundary.
fn truncate(text: &str, max_bytes: usize) -> &str {
    if text.len() <= max_bytes {
        return text;
    }

    let mut end = max_bytes;
    while !text.is_char_boundary(end) {
        end -= 1;
    }

    &text[..end]
}

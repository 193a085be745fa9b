//! Outbound forwarding to the upstream GIS server.
//!
//! # Responsibilities
//! - Issue the outbound call with the inbound method and body
//! - Map transport failures onto the relay error taxonomy
//! - Capture the upstream envelope (status, Content-Type,
//!   Content-Length, body bytes) without transformation
//!
//! # Design Decisions
//! - One attempt per request, no retry loop; tile fetches are cheap to
//!   reissue from the browser
//! - Body bytes are buffered, never re-encoded or re-parsed
//! - Timeouts come from the shared client, built once at startup

use axum::body::Bytes;
use axum::http::{HeaderValue, Method, StatusCode};

use crate::relay::error::RelayError;
use crate::relay::target::ForwardTarget;

/// Snapshot of an upstream response, consumed immediately when writing
/// the outbound response.
#[derive(Debug)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub content_type: Option<HeaderValue>,
    pub content_length: Option<u64>,
    pub body: Bytes,
}

/// Default Content-Type substituted when the upstream omits one, so
/// the browser never guesses (and refuses to render binary tiles).
pub const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Forward one request to the upstream and capture its response.
///
/// Non-2xx upstream statuses are NOT errors here; they come back as a
/// normal `UpstreamResponse` and pass through verbatim.
pub async fn forward(
    client: &reqwest::Client,
    method: Method,
    target: &ForwardTarget,
    body: Option<Bytes>,
) -> Result<UpstreamResponse, RelayError> {
    let mut request = client.request(method, target.url.clone());
    if let Some(bytes) = body {
        request = request.body(bytes);
    }

    let response = request.send().await.map_err(map_transport_error)?;

    let status = response.status();
    let content_type = response
        .headers()
        .get(axum::http::header::CONTENT_TYPE)
        .cloned();
    let content_length = response.content_length();

    let body = response.bytes().await.map_err(map_transport_error)?;

    Ok(UpstreamResponse {
        status,
        content_type,
        content_length,
        body,
    })
}

/// Classify a reqwest transport failure. Connect-phase failures
/// (refused, DNS, TLS, connect timeout) are "unreachable"; everything
/// that hit the total deadline is a timeout.
fn map_transport_error(error: reqwest::Error) -> RelayError {
    if error.is_connect() {
        RelayError::UpstreamUnreachable(error.without_url().to_string())
    } else if error.is_timeout() {
        RelayError::UpstreamTimeout
    } else {
        // The URL is stripped from the message: it may leak internal
        // topology into the error body when debug is off.
        RelayError::UpstreamUnreachable(error.without_url().to_string())
    }
}

//! CORS layer construction.
//!
//! The layer wraps the relay routes, so success responses, relay
//! error envelopes, and passed-through upstream errors all carry the
//! CORS headers; a fetch from the map client never fails purely on
//! CORS grounds. Preflight OPTIONS requests are answered locally.

use axum::http::{header, HeaderValue, Method};
use thiserror::Error;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::config::schema::CorsConfig;

/// An allow-list entry that does not parse as a header value. Config
/// validation catches this for file-loaded configs; callers building
/// a `RelayConfig` directly get the same check here instead of a
/// silently shrunken allow-list.
#[derive(Debug, Error)]
#[error("invalid CORS origin: {0:?}")]
pub struct InvalidCorsOrigin(pub String);

/// Build the CORS layer from configuration. The single entry `"*"`
/// permits any origin; otherwise the configured list applies.
pub fn cors_layer(config: &CorsConfig) -> Result<CorsLayer, InvalidCorsOrigin> {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    if config.allowed_origins.iter().any(|o| o == "*") {
        return Ok(layer.allow_origin(Any));
    }

    let origins = config
        .allowed_origins
        .iter()
        .map(|o| {
            o.parse::<HeaderValue>()
                .map_err(|_| InvalidCorsOrigin(o.clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(layer.allow_origin(AllowOrigin::list(origins)))
}

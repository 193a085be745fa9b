//! Relay-local error taxonomy.
//!
//! Only failures the relay itself produces live here. Upstream
//! application errors (a 404, a malformed-filter 400) are never
//! reinterpreted; they pass through with their original status and
//! body so the map client's own error handling keeps working.

use std::time::Duration;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use url::Url;

/// A failure the relay produced locally, as opposed to an upstream
/// response it merely forwards.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Neither the path suffix nor the routing query parameter yielded
    /// a non-empty upstream path. No upstream call is attempted.
    #[error("no upstream path in request: supply a path suffix or a 'path' query parameter")]
    Routing,

    /// Connection refused, DNS failure, or another transport error
    /// before a response arrived.
    #[error("upstream unreachable: {0}")]
    UpstreamUnreachable(String),

    /// The configured total timeout elapsed without a response.
    #[error("upstream request timed out")]
    UpstreamTimeout,
}

impl RelayError {
    /// Machine-readable kind for the JSON error envelope.
    pub fn kind(&self) -> &'static str {
        match self {
            RelayError::Routing => "RoutingError",
            RelayError::UpstreamUnreachable(_) => "UpstreamUnreachable",
            RelayError::UpstreamTimeout => "UpstreamTimeout",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::Routing => StatusCode::BAD_REQUEST,
            RelayError::UpstreamUnreachable(_) => StatusCode::BAD_GATEWAY,
            RelayError::UpstreamTimeout => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    /// Render the JSON error envelope. The attempted upstream URL is
    /// only included when the debug flag is set; by default it is
    /// withheld because it can reveal internal network topology.
    pub fn into_response_with(self, elapsed: Duration, target: Option<&Url>, debug: bool) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
            kind: self.kind(),
            elapsed_ms: elapsed.as_millis() as u64,
            target_url: if debug {
                target.map(|u| u.to_string())
            } else {
                None
            },
        };
        (self.status(), Json(body)).into_response()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    error: String,
    kind: &'static str,
    elapsed_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    target_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_and_statuses_line_up() {
        assert_eq!(RelayError::Routing.kind(), "RoutingError");
        assert_eq!(RelayError::Routing.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            RelayError::UpstreamUnreachable("refused".into()).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            RelayError::UpstreamTimeout.status(),
            StatusCode::GATEWAY_TIMEOUT
        );
    }

    #[test]
    fn target_url_withheld_unless_debug() {
        let url = Url::parse("http://10.0.0.5:8080/geoserver/ws/wms").unwrap();

        let body = ErrorBody {
            error: "x".into(),
            kind: "UpstreamUnreachable",
            elapsed_ms: 12,
            target_url: None,
        };
        let rendered = serde_json::to_string(&body).unwrap();
        assert!(!rendered.contains("targetUrl"));

        let body = ErrorBody {
            error: "x".into(),
            kind: "UpstreamUnreachable",
            elapsed_ms: 12,
            target_url: Some(url.to_string()),
        };
        let rendered = serde_json::to_string(&body).unwrap();
        assert!(rendered.contains("\"targetUrl\""));
        assert!(rendered.contains("\"elapsedMs\":12"));
    }
}

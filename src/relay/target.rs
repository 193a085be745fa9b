//! Forward-target resolution.
//!
//! # Responsibilities
//! - Resolve the upstream path from the inbound request (path suffix
//!   first, then the reserved `path` query parameter)
//! - Strip the routing key from the forwarded query set
//! - Build the upstream URL with normalized path joining and proper
//!   percent-encoding, preserving parameter order and duplicate keys
//!
//! # Design Decisions
//! - Query parameters are kept as an ordered pair list, never a map:
//!   WMS/WFS servers accept repeated keys and some are order-sensitive
//!   in practice
//! - The routing key is stripped unconditionally, even when the path
//!   came from the suffix convention

use url::form_urlencoded;
use url::Url;

use crate::relay::error::RelayError;

/// Reserved query parameter carrying the upstream path in the
/// query-parameter routing convention.
pub const ROUTING_KEY: &str = "path";

/// Fully resolved destination for one forwarded request.
#[derive(Debug, Clone)]
pub struct ForwardTarget {
    /// Complete upstream URL, query included.
    pub url: Url,
}

impl ForwardTarget {
    /// Resolve the target from the configured base origin, the inbound
    /// path relative to the relay mount, and the raw query string.
    ///
    /// `relative_path` is the request path with the mount prefix
    /// already removed (axum strips it when nesting), still
    /// percent-encoded.
    pub fn resolve(
        base_origin: &str,
        relative_path: &str,
        raw_query: Option<&str>,
    ) -> Result<ForwardTarget, RelayError> {
        let pairs: Vec<(String, String)> = raw_query
            .map(|q| {
                form_urlencoded::parse(q.as_bytes())
                    .into_owned()
                    .collect()
            })
            .unwrap_or_default();

        // Path suffix wins; the `path` parameter is the fallback.
        let suffix = relative_path.trim_matches('/');
        let upstream_path = if !suffix.is_empty() {
            suffix.to_string()
        } else {
            pairs
                .iter()
                .find(|(k, _)| k == ROUTING_KEY)
                .map(|(_, v)| v.trim_matches('/').to_string())
                .unwrap_or_default()
        };

        if upstream_path.is_empty() {
            return Err(RelayError::Routing);
        }

        let forwarded: Vec<&(String, String)> =
            pairs.iter().filter(|(k, _)| k != ROUTING_KEY).collect();

        // Exactly one separating slash, regardless of how the operator
        // wrote base_origin.
        let joined = format!("{}/{}", base_origin.trim_end_matches('/'), upstream_path);
        // A join that does not parse means the inbound path was
        // unusable; no upstream call was attempted, so this is a
        // client-side routing failure, not a gateway one.
        let mut url = Url::parse(&joined).map_err(|_| RelayError::Routing)?;

        if !forwarded.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(forwarded.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }

        Ok(ForwardTarget { url })
    }
}

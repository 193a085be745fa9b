//! HTTP server setup and request handling.
//!
//! # Responsibilities
//! - Create the axum Router with the relay handler mounted under the
//!   configured path prefix
//! - Wire up middleware (tracing, request ID, CORS)
//! - Build the shared outbound client (timeouts, TLS policy)
//! - Copy the upstream envelope back to the caller verbatim

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Method, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use thiserror::Error;
use tower_http::cors::CorsLayer;

use crate::config::RelayConfig;
use crate::http::cors::{cors_layer, InvalidCorsOrigin};
use crate::observability::metrics;
use crate::relay::{forward, ForwardTarget, UpstreamResponse, FALLBACK_CONTENT_TYPE};

/// Failure to assemble the server from its configuration.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to build outbound client: {0}")]
    Client(#[from] reqwest::Error),

    #[error(transparent)]
    Cors(#[from] InvalidCorsOrigin),
}

/// Largest request body the relay will buffer for POST pass-through
/// (WFS transactions are small XML documents).
const MAX_FORWARD_BODY: usize = 2 * 1024 * 1024;

/// Application state injected into the handler. Cloning is cheap: the
/// config is behind an Arc and the client shares its internal pool.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<RelayConfig>,
    pub client: reqwest::Client,
}

/// HTTP server for the relay.
pub struct RelayServer {
    router: Router,
    config: Arc<RelayConfig>,
}

impl RelayServer {
    /// Create a new server with the given configuration. Fails if the
    /// outbound client or the CORS allow-list cannot be constructed.
    pub fn new(config: RelayConfig) -> Result<Self, ServerError> {
        let config = Arc::new(config);

        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_millis(config.timeouts.connect_ms))
            .timeout(Duration::from_millis(config.timeouts.total_ms))
            .danger_accept_invalid_certs(config.upstream.insecure_skip_tls_verify)
            .build()?;

        let state = AppState {
            config: config.clone(),
            client,
        };

        let cors = cors_layer(&config.cors)?;
        let router = Self::build_router(&config, state, cors);
        Ok(Self { router, config })
    }

    /// Build the axum router with all middleware layers.
    fn build_router(config: &RelayConfig, state: AppState, cors: CorsLayer) -> Router {
        let relay_routes = Router::new()
            .route("/", any(relay_handler))
            .route("/{*path}", any(relay_handler))
            .with_state(state);

        // ServiceBuilder order: first listed runs outermost. CORS sits
        // innermost, directly around the routes; the handler is inside
        // it, so success responses and error envelopes alike pick up
        // the headers, and preflights are answered before the handler.
        Router::new()
            .nest(&config.listener.mount_path, relay_routes)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(cors),
            )
    }

    /// Run the server, accepting connections on the given listener
    /// until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> io::Result<()> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            mount_path = %self.config.listener.mount_path,
            upstream = %self.config.upstream.base_origin,
            "relay listening"
        );

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("relay stopped");
        Ok(())
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }
}

/// Main relay handler: resolve the forward target, call upstream, and
/// copy the envelope back.
async fn relay_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let (parts, body) = request.into_parts();
    let method = parts.method;

    // Preflights are answered locally; the CORS layer decorates the
    // response. Upstream is never contacted for OPTIONS.
    if method == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }

    // The mount prefix is already stripped by the nested router, so
    // uri.path() is the upstream path suffix (still percent-encoded).
    let target = match ForwardTarget::resolve(
        &state.config.upstream.base_origin,
        parts.uri.path(),
        parts.uri.query(),
    ) {
        Ok(target) => target,
        Err(e) => {
            tracing::warn!(path = %parts.uri.path(), error = %e, "no resolvable upstream path");
            metrics::record_request(method.as_str(), e.status().as_u16(), start);
            return e.into_response_with(start.elapsed(), None, state.config.debug);
        }
    };

    // Upstream URL only; bodies may be multi-megabyte binary tiles.
    tracing::debug!(method = %method, upstream_url = %target.url, "relaying request");

    let body_bytes = if method == Method::GET || method == Method::HEAD {
        None
    } else {
        match axum::body::to_bytes(body, MAX_FORWARD_BODY).await {
            Ok(bytes) if bytes.is_empty() => None,
            Ok(bytes) => Some(bytes),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read request body");
                metrics::record_request(method.as_str(), 400, start);
                return (StatusCode::BAD_REQUEST, "failed to read request body").into_response();
            }
        }
    };

    match forward(&state.client, method.clone(), &target, body_bytes).await {
        Ok(upstream) => {
            tracing::debug!(
                method = %method,
                status = upstream.status.as_u16(),
                bytes = upstream.body.len(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "upstream answered"
            );
            metrics::record_request(method.as_str(), upstream.status.as_u16(), start);
            copy_envelope(upstream)
        }
        Err(e) => {
            tracing::warn!(
                kind = e.kind(),
                error = %e,
                elapsed_ms = start.elapsed().as_millis() as u64,
                "relay failure"
            );
            metrics::record_request(method.as_str(), e.status().as_u16(), start);
            e.into_response_with(start.elapsed(), Some(&target.url), state.config.debug)
        }
    }
}

/// Copy the upstream envelope into the outbound response: status and
/// body verbatim, Content-Type defaulted when absent so the browser
/// never guesses, Content-Length only when upstream supplied one.
fn copy_envelope(upstream: UpstreamResponse) -> Response {
    let content_type = upstream
        .content_type
        .unwrap_or_else(|| HeaderValue::from_static(FALLBACK_CONTENT_TYPE));

    let mut builder = Response::builder()
        .status(upstream.status)
        .header(header::CONTENT_TYPE, content_type);

    if let Some(len) = upstream.content_length {
        builder = builder.header(header::CONTENT_LENGTH, len);
    }

    builder
        .body(Body::from(upstream.body))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

//! Same-origin relay for an upstream WMS/WFS GIS server.
//!
//! Browsers refuse cross-origin fetches, so the map client cannot call
//! the GIS server directly. The relay sits on the client's origin,
//! reconstructs the upstream URL from each inbound request, forwards
//! it, and copies the response back byte for byte with permissive CORS
//! headers attached.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────┐
//!                    │                GIS RELAY                  │
//!  Map Client        │  ┌──────┐   ┌─────────┐   ┌───────────┐  │
//!  ───────────────── ┼─▶│ http │──▶│ relay:: │──▶│ relay::   │──┼──▶ GIS server
//!  GET /relay/ws/wms │  │server│   │ target  │   │ forward   │  │    (WMS/WFS)
//!                    │  └──────┘   └─────────┘   └─────┬─────┘  │
//!                    │                                  │        │
//!  ◀──────────────── ┼──── status + Content-Type + body ┘        │
//!                    │                                           │
//!                    │  cross-cutting: config, lifecycle,        │
//!                    │  observability, CORS                      │
//!                    └──────────────────────────────────────────┘
//! ```
//!
//! Stateless per request: the only shared state is the immutable
//! configuration and the outbound client's connection pool.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod relay;

pub use config::RelayConfig;
pub use http::RelayServer;
pub use lifecycle::Shutdown;

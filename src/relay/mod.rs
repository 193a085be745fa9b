//! Forwarding core.
//!
//! # Data Flow
//! ```text
//! inbound request (method, path, query)
//!     → target.rs (resolve upstream path, strip routing key,
//!                  build upstream URL)
//!     → forward.rs (outbound call, bounded by timeouts)
//!     → UpstreamResponse (status, Content-Type, body bytes)
//!     → http/server.rs copies the envelope back verbatim
//! ```
//!
//! Stateless per request: nothing here is retained across calls.

pub mod error;
pub mod forward;
pub mod target;

pub use error::RelayError;
pub use forward::{forward, UpstreamResponse, FALLBACK_CONTENT_TYPE};
pub use target::{ForwardTarget, ROUTING_KEY};

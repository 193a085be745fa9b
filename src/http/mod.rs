//! HTTP surface of the relay.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (axum setup, middleware, mount point)
//!     → cors.rs (permissive headers on every response, preflights)
//!     → relay core (target resolution + forwarding)
//!     → envelope copied back to the client
//! ```

pub mod cors;
pub mod server;

pub use server::{AppState, RelayServer, ServerError};

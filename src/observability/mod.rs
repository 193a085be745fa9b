//! Observability subsystem.
//!
//! Logging is initialized in `main` via `tracing-subscriber`; this
//! module carries the Prometheus metrics endpoint. Metrics are cheap
//! atomic updates, recorded once per relayed request.

pub mod metrics;

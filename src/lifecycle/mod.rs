//! Lifecycle management.
//!
//! Startup is linear: load config, validate, bind, serve. Shutdown is
//! coordinated through a broadcast channel so the serve loop (and
//! tests) can stop the server cleanly.

pub mod shutdown;

pub use shutdown::Shutdown;

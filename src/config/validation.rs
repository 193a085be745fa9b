//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the upstream origin is an absolute http/https URL
//! - Validate value ranges (timeouts > 0, origins parse as header values)
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: RelayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use axum::http::HeaderValue;
use thiserror::Error;
use url::Url;

use crate::config::schema::RelayConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("upstream.base_origin is not a valid URL: {0}")]
    InvalidBaseOrigin(String),

    #[error("upstream.base_origin must use http or https, got {0}")]
    UnsupportedScheme(String),

    #[error("listener.mount_path must start with '/' and not be bare '/', got {0:?}")]
    InvalidMountPath(String),

    #[error("timeouts.{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("cors.allowed_origins entry is not a valid origin: {0:?}")]
    InvalidOrigin(String),
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match Url::parse(&config.upstream.base_origin) {
        Ok(url) => {
            if url.scheme() != "http" && url.scheme() != "https" {
                errors.push(ValidationError::UnsupportedScheme(url.scheme().to_string()));
            }
        }
        Err(e) => errors.push(ValidationError::InvalidBaseOrigin(e.to_string())),
    }

    let mount = &config.listener.mount_path;
    if !mount.starts_with('/') || mount.trim_matches('/').is_empty() {
        errors.push(ValidationError::InvalidMountPath(mount.clone()));
    }

    if config.timeouts.connect_ms == 0 {
        errors.push(ValidationError::ZeroTimeout("connect_ms"));
    }
    if config.timeouts.total_ms == 0 {
        errors.push(ValidationError::ZeroTimeout("total_ms"));
    }

    for origin in &config.cors.allowed_origins {
        if origin != "*" && HeaderValue::from_str(origin).is_err() {
            errors.push(ValidationError::InvalidOrigin(origin.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::RelayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<RelayConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: RelayConfig = toml::from_str(&content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_config() {
        let config: RelayConfig = toml::from_str(
            r#"
            [upstream]
            base_origin = "https://gis.example.net/geoserver"
            "#,
        )
        .unwrap();

        assert_eq!(
            config.upstream.base_origin,
            "https://gis.example.net/geoserver"
        );
        // Everything else falls back to defaults.
        assert_eq!(config.listener.mount_path, "/relay");
        assert_eq!(config.timeouts.total_ms, 30_000);
        assert!(!config.debug);
    }

    #[test]
    fn parses_full_config() {
        let config: RelayConfig = toml::from_str(
            r#"
            debug = true

            [listener]
            bind_address = "127.0.0.1:9000"
            mount_path = "/gis"

            [upstream]
            base_origin = "https://10.0.0.5:8443/geoserver"
            insecure_skip_tls_verify = true

            [cors]
            allowed_origins = ["http://localhost:5173"]

            [timeouts]
            connect_ms = 2000
            total_ms = 8000
            "#,
        )
        .unwrap();

        assert!(config.debug);
        assert!(config.upstream.insecure_skip_tls_verify);
        assert_eq!(config.cors.allowed_origins, vec!["http://localhost:5173"]);
        assert_eq!(config.timeouts.connect_ms, 2000);
    }
}

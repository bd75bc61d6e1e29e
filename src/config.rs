//! Service configuration
//!
//! Defaults come from `DXF_GEOJSON_*` environment variables, a TOML file may
//! replace them, and the binaries apply command-line overrides last.

use crate::convert::DEFAULT_MAX_PAYLOAD_BYTES;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

/// Room for the JSON envelope around `dxf_base64`
const BODY_OVERHEAD_BYTES: usize = 64 * 1024;

/// HTTP service settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Address to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Largest accepted decoded drawing, in bytes
    pub max_payload_bytes: usize,

    /// Log filter used when `RUST_LOG` is unset
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: env::var("DXF_GEOJSON_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("DXF_GEOJSON_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8000),
            max_payload_bytes: env::var("DXF_GEOJSON_MAX_PAYLOAD_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_PAYLOAD_BYTES),
            log_level: env::var("DXF_GEOJSON_LOG").unwrap_or_else(|_| "info".to_string()),
        }
    }
}

impl ServiceConfig {
    /// Load from a TOML file; missing keys keep their defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: ServiceConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::Invalid("host must not be empty".into()));
        }
        if self.max_payload_bytes == 0 {
            return Err(ConfigError::Invalid(
                "max_payload_bytes must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    /// `host:port`
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Request body limit: the base64 form of the largest payload plus the
    /// JSON envelope
    pub fn body_limit(&self) -> usize {
        self.max_payload_bytes
            .div_ceil(3)
            .saturating_mul(4)
            .saturating_add(BODY_OVERHEAD_BYTES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ServiceConfig::from_toml("port = 9001\n").unwrap();
        assert_eq!(config.port, 9001);
        assert_eq!(config.max_payload_bytes, ServiceConfig::default().max_payload_bytes);
    }

    #[test]
    fn test_validation() {
        let err = ServiceConfig::from_toml("max_payload_bytes = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(matches!(
            ServiceConfig::from_toml("port = \"x\"\n"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_body_limit_covers_base64() {
        let config = ServiceConfig {
            max_payload_bytes: 300,
            ..ServiceConfig::default()
        };
        assert_eq!(config.body_limit(), 400 + BODY_OVERHEAD_BYTES);
    }

    #[test]
    fn test_bind_address() {
        let config = ServiceConfig {
            host: "127.0.0.1".into(),
            port: 8080,
            ..ServiceConfig::default()
        };
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
    }
}

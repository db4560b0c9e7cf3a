//! Process configuration, read from `EVENTGATE_*` environment variables.

use std::net::SocketAddr;

use thiserror::Error;

use eventgate_events::ErrorEventConfig;

pub const LISTEN_ADDR_VAR: &str = "EVENTGATE_LISTEN_ADDR";
pub const ERROR_STREAM_VAR: &str = "EVENTGATE_ERROR_STREAM";
pub const ERROR_SCHEMA_URI_VAR: &str = "EVENTGATE_ERROR_SCHEMA_URI";
pub const MAX_BODY_BYTES_VAR: &str = "EVENTGATE_MAX_BODY_BYTES";

pub const DEFAULT_ERROR_SCHEMA_URI: &str = "/error/0.0.3";
pub const DEFAULT_MAX_BODY_BYTES: usize = 4 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid {var}={value:?}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub listen_addr: SocketAddr,
    /// `None` disables error events.
    pub error_events: Option<ErrorEventConfig>,
    pub max_body_bytes: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            error_events: None,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable source. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = Self::default();

        if let Some(value) = get(LISTEN_ADDR_VAR) {
            config.listen_addr = value.parse().map_err(|e: std::net::AddrParseError| {
                ConfigError::Invalid {
                    var: LISTEN_ADDR_VAR,
                    value: value.clone(),
                    reason: e.to_string(),
                }
            })?;
        }

        if let Some(value) = get(MAX_BODY_BYTES_VAR) {
            config.max_body_bytes = match value.parse::<usize>() {
                Ok(n) if n > 0 => n,
                Ok(_) => {
                    return Err(ConfigError::Invalid {
                        var: MAX_BODY_BYTES_VAR,
                        value,
                        reason: "must be greater than zero".to_string(),
                    });
                }
                Err(e) => {
                    return Err(ConfigError::Invalid {
                        var: MAX_BODY_BYTES_VAR,
                        value,
                        reason: e.to_string(),
                    });
                }
            };
        }

        config.error_events = get(ERROR_STREAM_VAR).map(|error_stream| {
            let schema_uri =
                get(ERROR_SCHEMA_URI_VAR).unwrap_or_else(|| DEFAULT_ERROR_SCHEMA_URI.to_string());
            ErrorEventConfig::new(schema_uri, error_stream)
        });

        Ok(config)
    }
}

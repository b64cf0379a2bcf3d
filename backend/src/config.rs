//! Server configuration
//!
//! Defaults, then an optional JSON file named by `SIXCHESS_CONFIG`, then
//! individual environment overrides. A `.env` file in the working directory
//! is loaded into the environment first.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

pub const CONFIG_FILE_VAR: &str = "SIXCHESS_CONFIG";
pub const HOST_VAR: &str = "SIXCHESS_HOST";
pub const PORT_VAR: &str = "SIXCHESS_PORT";
pub const LOG_VAR: &str = "SIXCHESS_LOG";
pub const EVENT_BUFFER_VAR: &str = "SIXCHESS_EVENT_BUFFER";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// `tracing_subscriber::EnvFilter` directive, overridden by `RUST_LOG`
    pub log_filter: String,
    /// Capacity of the game event broadcast channel
    pub event_buffer: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "0.0.0.0".to_string(),
            port: 8080,
            log_filter: "info".to_string(),
            event_buffer: 256,
        }
    }
}

impl ServerConfig {
    /// Load from `.env`, the optional config file and the process environment
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using `lookup` in place of the process environment
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = match lookup(CONFIG_FILE_VAR) {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        if let Some(host) = lookup(HOST_VAR) {
            config.host = host;
        }
        if let Some(port) = lookup(PORT_VAR) {
            config.port = parse_var(PORT_VAR, &port)?;
        }
        if let Some(filter) = lookup(LOG_VAR) {
            config.log_filter = filter;
        }
        if let Some(buffer) = lookup(EVENT_BUFFER_VAR) {
            config.event_buffer = parse_var(EVENT_BUFFER_VAR, &buffer)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Read a JSON config file; missing fields keep their defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: display.clone(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: display,
            source,
        })
    }

    /// `host:port` for the listener
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        // tokio's broadcast channel rejects a zero capacity
        if self.event_buffer == 0 {
            return Err(ConfigError::InvalidValue {
                key: "event_buffer".to_string(),
                value: "0".to_string(),
            });
        }
        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

//! Server configuration from environment variables.

use std::env;
use std::fmt;
use std::str::FromStr;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("expected \"text\" or \"json\", got \"{}\"", other)),
        }
    }
}

/// Where books are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageBackend {
    /// PostgreSQL, configured through `StoreConfig::from_env`.
    #[default]
    Postgres,
    /// Process memory. Contents are lost on shutdown.
    Memory,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "postgres" => Ok(Self::Postgres),
            "memory" => Ok(Self::Memory),
            other => Err(format!(
                "expected \"postgres\" or \"memory\", got \"{}\"",
                other
            )),
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Postgres => f.write_str("postgres"),
            Self::Memory => f.write_str("memory"),
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server port to listen on.
    pub port: u16,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
    /// Log output format.
    pub log_format: LogFormat,
    /// CORS allowed origins (comma-separated or "*" for all).
    pub cors_allowed_origins: String,
    /// Storage backend.
    pub storage: StorageBackend,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
            cors_allowed_origins: "*".to_string(),
            storage: StorageBackend::Postgres,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Optional:
    /// - `PORT`: Server port (default: 8080)
    /// - `LOG_LEVEL`: Logging level (default: "info")
    /// - `LOG_FORMAT`: "text" or "json" (default: "text")
    /// - `CORS_ALLOWED_ORIGINS`: Allowed CORS origins (default: "*")
    /// - `STORAGE_BACKEND`: "postgres" or "memory" (default: "postgres")
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = match var("PORT") {
            Some(s) => s.parse().map_err(|_| ConfigError::InvalidValue {
                name: "PORT".to_string(),
                reason: format!("\"{}\" is not a valid port", s),
            })?,
            None => defaults.port,
        };

        let log_level = var("LOG_LEVEL").unwrap_or(defaults.log_level);

        let log_format = parse_or(&var, "LOG_FORMAT", defaults.log_format)?;

        let cors_allowed_origins = var("CORS_ALLOWED_ORIGINS").unwrap_or(defaults.cors_allowed_origins);

        let storage = parse_or(&var, "STORAGE_BACKEND", defaults.storage)?;

        Ok(Self {
            port,
            log_level,
            log_format,
            cors_allowed_origins,
            storage,
        })
    }

    /// Get the socket address for the server.
    pub fn socket_addr(&self) -> std::net::SocketAddr {
        std::net::SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

fn parse_or<T>(
    var: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr<Err = String>,
{
    match var(name) {
        Some(s) => s.parse().map_err(|reason| ConfigError::InvalidValue {
            name: name.to_string(),
            reason,
        }),
        None => Ok(default),
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Invalid environment variable value.
    #[error("invalid value for environment variable {name}: {reason}")]
    InvalidValue { name: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn test_default_values() {
        let config = ServerConfig::from_vars(lookup(&[])).unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_format, LogFormat::Text);
        assert_eq!(config.cors_allowed_origins, "*");
        assert_eq!(config.storage, StorageBackend::Postgres);
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_vars(lookup(&[
            ("PORT", "9000"),
            ("LOG_LEVEL", "debug"),
            ("LOG_FORMAT", "JSON"),
            ("STORAGE_BACKEND", "memory"),
        ]))
        .unwrap();

        assert_eq!(config.port, 9000);
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.storage, StorageBackend::Memory);
        assert_eq!(config.socket_addr().port(), 9000);
    }

    #[test]
    fn test_invalid_port() {
        let err = ServerConfig::from_vars(lookup(&[("PORT", "eighty")])).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn test_invalid_storage_backend() {
        let err = ServerConfig::from_vars(lookup(&[("STORAGE_BACKEND", "sqlite")])).unwrap_err();
        match err {
            ConfigError::InvalidValue { name, reason } => {
                assert_eq!(name, "STORAGE_BACKEND");
                assert!(reason.contains("sqlite"));
            }
        }
    }
}

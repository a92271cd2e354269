//! Startup configuration.
//!
//! # Responsibilities
//! - Resolve the listening port: explicit argument, else `PORT` environment
//!   variable, else the default
//! - Validate the port range before anything binds
//!
//! # Design Decisions
//! - Invalid values fail fast at startup rather than silently falling back
//! - Config is immutable once constructed

use thiserror::Error;

/// Port used when neither an argument nor `PORT` is provided.
pub const DEFAULT_PORT: u16 = 3000;

/// Environment variable consulted by [`ServerConfig::from_env`].
pub const PORT_ENV_VAR: &str = "PORT";

/// Error type for configuration resolution.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The port value could not be parsed or is outside 1..=65535.
    #[error("invalid port {value:?}: expected an integer in 1..=65535")]
    InvalidPort { value: String },
}

/// Immutable server configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerConfig {
    /// TCP port the server listens on.
    pub port: u16,
}

impl ServerConfig {
    /// Create a configuration with an explicit port.
    pub fn new(port: u16) -> Result<Self, ConfigError> {
        if port == 0 {
            return Err(ConfigError::InvalidPort {
                value: port.to_string(),
            });
        }
        Ok(Self { port })
    }

    /// Resolve configuration from the environment.
    ///
    /// Uses `PORT` when set, otherwise [`DEFAULT_PORT`]. An unparseable or
    /// out-of-range value is an error, not a fallback.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var(PORT_ENV_VAR) {
            Ok(raw) => {
                let port = raw
                    .trim()
                    .parse::<u16>()
                    .map_err(|_| ConfigError::InvalidPort { value: raw.clone() })?;
                Self::new(port)
            }
            Err(_) => Self::new(DEFAULT_PORT),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: DEFAULT_PORT }
    }
}

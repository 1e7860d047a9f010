//! Configuration error types.

use thiserror::Error;

/// Errors while loading configuration from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration loading failed: {0}")]
    Load(#[from] config::ConfigError),
}

/// Errors from semantic validation of loaded configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("server port must not be 0")]
    InvalidPort,

    #[error("per-session buffer capacity must be at least 1")]
    ZeroSessionBuffer,

    #[error("client api base must be an http(s) url")]
    InvalidApiBase,

    #[error("reconnect delay must be at least 1 second")]
    ZeroReconnectDelay,
}

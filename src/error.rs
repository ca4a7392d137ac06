// file: src/error.rs
// version: 1.0.0
// guid: 91d4f7a2-3b8c-4e15-a6d9-0c5b72e18f44

use thiserror::Error;

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, DsClientError>;

/// Error types for the ds-sim scheduling client
#[derive(Error, Debug)]
pub enum DsClientError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Protocol error: {0}")]
    ProtocolError(String),

    #[error("Scheduling error: {0}")]
    SchedulingError(String),

    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

impl DsClientError {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Create a new connection error
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create a new protocol error
    pub fn protocol(msg: impl Into<String>) -> Self {
        Self::ProtocolError(msg.into())
    }

    /// Create a new scheduling error
    pub fn scheduling(msg: impl Into<String>) -> Self {
        Self::SchedulingError(msg.into())
    }
}

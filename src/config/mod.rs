// file: src/config/mod.rs
// version: 1.0.0
// guid: c27a93d6-1e4b-4f80-a53c-8b6b9de740f3

//! Configuration module for the ds-sim scheduling client
//!
//! Handles loading and validation of optional client defaults files. Values
//! given on the command line always override values from the file.

pub mod loader;

pub use loader::ConfigLoader;

use crate::Result;
use serde::{Deserialize, Serialize};

/// Optional client defaults loaded from a YAML file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    /// Host running ds-server
    pub host: Option<String>,
    /// Port ds-server listens on
    pub port: Option<u16>,
    /// Identity sent in the AUTH command
    pub user: Option<String>,
    /// Scheduling algorithm name
    pub algo: Option<String>,
}

impl ClientConfig {
    /// Validate field values that serde cannot reject on its own
    pub fn validate(&self) -> Result<()> {
        if let Some(host) = &self.host {
            if host.trim().is_empty() {
                return Err(crate::error::DsClientError::ConfigError(
                    "host must not be empty".to_string(),
                ));
            }
        }
        if let Some(user) = &self.user {
            if user.trim().is_empty() {
                return Err(crate::error::DsClientError::ConfigError(
                    "user must not be empty".to_string(),
                ));
            }
        }
        if self.port == Some(0) {
            return Err(crate::error::DsClientError::ConfigError(
                "port must be nonzero".to_string(),
            ));
        }
        Ok(())
    }
}

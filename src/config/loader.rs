// file: src/config/loader.rs
// version: 1.0.0
// guid: d38ba4e7-2f5c-4a91-b64d-9c7cadf851a4

//! Configuration file loading and environment variable substitution

use super::ClientConfig;
use crate::Result;
use regex::Regex;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Configuration loader with environment variable substitution
pub struct ConfigLoader {
    env_vars: HashMap<String, String>,
}

impl ConfigLoader {
    /// Create a new config loader
    pub fn new() -> Self {
        Self {
            env_vars: std::env::vars().collect(),
        }
    }

    /// Load client defaults from a YAML file
    pub fn load_client_config<P: AsRef<Path>>(&self, path: P) -> Result<ClientConfig> {
        let content = fs::read_to_string(&path).map_err(|e| {
            crate::error::DsClientError::ConfigError(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        let expanded = self.expand_env_vars(&content)?;
        let config: ClientConfig = serde_yaml::from_str(&expanded)?;

        config.validate()?;

        Ok(config)
    }

    /// Expand `${VAR}` environment variables in configuration content
    fn expand_env_vars(&self, content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| {
            crate::error::DsClientError::ConfigError(format!("Invalid regex pattern: {}", e))
        })?;

        let mut result = content.to_string();
        let mut missing_vars = Vec::new();

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let placeholder = &cap[0];

            if let Some(value) = self.env_vars.get(var_name) {
                result = result.replace(placeholder, value);
            } else {
                missing_vars.push(var_name.to_string());
            }
        }

        if !missing_vars.is_empty() {
            return Err(crate::error::DsClientError::ConfigError(format!(
                "Missing environment variables: {}",
                missing_vars.join(", ")
            )));
        }

        Ok(result)
    }

    /// Set environment variable for substitution
    pub fn set_env_var(&mut self, key: String, value: String) {
        self.env_vars.insert(key, value);
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_env_var_expansion() {
        let mut loader = ConfigLoader::new();
        loader.set_env_var("TEST_DS_USER".to_string(), "48677922".to_string());

        let content = "user: ${TEST_DS_USER}";
        let result = loader.expand_env_vars(content).unwrap();
        assert_eq!(result, "user: 48677922");
    }

    #[test]
    fn test_missing_env_var() {
        let loader = ConfigLoader::new();
        let content = "user: ${DS_CLIENT_MISSING_VAR}";

        let result = loader.expand_env_vars(content);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Missing environment variables"));
    }

    #[test]
    fn test_load_client_config() -> crate::Result<()> {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
host: sim-host
port: 50123
user: "48677922"
algo: ect
"#
        )
        .unwrap();

        let loader = ConfigLoader::new();
        let config = loader.load_client_config(file.path())?;

        assert_eq!(config.host.as_deref(), Some("sim-host"));
        assert_eq!(config.port, Some(50123));
        assert_eq!(config.user.as_deref(), Some("48677922"));
        assert_eq!(config.algo.as_deref(), Some("ect"));

        Ok(())
    }

    #[test]
    fn test_load_rejects_unknown_field() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "hostname: sim-host").unwrap();

        let loader = ConfigLoader::new();
        assert!(loader.load_client_config(file.path()).is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let loader = ConfigLoader::new();
        let result = loader.load_client_config("/nonexistent/ds-client.yaml");
        assert!(result.is_err());
    }
}

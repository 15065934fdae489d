//! CDN API connection settings
//!
//! ## Configuration Sources (in precedence order)
//!
//! 1. `--endpoint` CLI flag (applied by the caller via [`ApiConfig::with_endpoint`])
//! 2. `FRONTIER_API_ENDPOINT` environment variable
//! 3. Explicit config file (`--api-config`)
//! 4. `~/.config/frontier/api.yml`
//! 5. Built-in defaults
//!
//! ```yaml
//! endpoint: https://cdn-api.example.com/2020-05-31
//! api_token_env: FRONTIER_API_TOKEN
//! timeout_seconds: 30
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use crate::error::{FrontierError, Result};

/// Environment variable overriding the configured endpoint
pub const ENDPOINT_ENV: &str = "FRONTIER_API_ENDPOINT";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the CDN management API
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Environment variable name containing the bearer token
    #[serde(default = "default_api_token_env")]
    pub api_token_env: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_token_env: default_api_token_env(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_endpoint() -> String {
    "https://cloudfront.amazonaws.com/2020-05-31".to_string()
}

fn default_api_token_env() -> String {
    "FRONTIER_API_TOKEN".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl ApiConfig {
    /// Parse a config file; a missing file is an error
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| FrontierError::io(path, e))?;
        let config: ApiConfig = serde_yaml_ng::from_str(&content)?;
        debug!("Loaded API config from {}", path.display());
        Ok(config)
    }

    /// Default location of the user-level config file, if a config dir exists
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("frontier").join("api.yml"))
    }

    /// Resolve the effective configuration
    ///
    /// An explicit path must exist. The default path is used only when it
    /// exists. Environment overrides are applied last.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        let config = match explicit {
            Some(path) => Self::load_from_file(path)?,
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(path) => Self::load_from_file(&path)?,
                None => {
                    trace!("No API config file found, using defaults");
                    Self::default()
                }
            },
        };
        Ok(config.with_env_overrides(|key| std::env::var(key).ok()))
    }

    /// Apply environment overrides read through `lookup`
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(endpoint) = lookup(ENDPOINT_ENV).filter(|v| !v.is_empty()) {
            debug!("Using {} override: {}", ENDPOINT_ENV, endpoint);
            self.endpoint = endpoint;
        }
        self
    }

    pub fn with_endpoint(mut self, endpoint: Option<String>) -> Self {
        if let Some(endpoint) = endpoint {
            self.endpoint = endpoint;
        }
        self
    }

    /// Bearer token from the configured environment variable, if set
    pub fn api_token(&self) -> Option<String> {
        std::env::var(&self.api_token_env)
            .ok()
            .filter(|v| !v.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ApiConfig::default();
        assert_eq!(config.api_token_env, "FRONTIER_API_TOKEN");
        assert_eq!(config.timeout_seconds, 30);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "endpoint: http://localhost:9000").unwrap();

        let config = ApiConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.endpoint, "http://localhost:9000");
        assert_eq!(config.timeout_seconds, 30);
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = ApiConfig::resolve(Some(&dir.path().join("nope.yml")));
        assert!(matches!(result, Err(FrontierError::Io { .. })));
    }

    #[test]
    fn test_env_override_precedence() {
        let config = ApiConfig::default().with_env_overrides(|key| {
            (key == ENDPOINT_ENV).then(|| "http://from-env".to_string())
        });
        assert_eq!(config.endpoint, "http://from-env");

        let config = config.with_endpoint(Some("http://from-flag".to_string()));
        assert_eq!(config.endpoint, "http://from-flag");
    }

    #[test]
    fn test_empty_env_value_is_ignored() {
        let config = ApiConfig::default().with_env_overrides(|_| Some(String::new()));
        assert_eq!(config.endpoint, default_endpoint());
    }
}

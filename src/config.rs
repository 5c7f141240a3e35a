//! Configuration management for ipfabric-client
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.
//! Later sources win: file, then `IPF_*` environment variables, then
//! command-line flags.

use crate::error::{IpfError, Result};
use crate::pager::MAX_PAGE_SIZE;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable holding the instance base URL
pub const ENV_URL: &str = "IPF_URL";
/// Environment variable holding the API token
pub const ENV_TOKEN: &str = "IPF_TOKEN";
/// Environment variable holding the default snapshot selector
pub const ENV_SNAPSHOT: &str = "IPF_SNAPSHOT";
/// Environment variable toggling TLS certificate verification
pub const ENV_VERIFY: &str = "IPF_VERIFY";
/// Environment variable holding the per-request timeout in seconds
pub const ENV_TIMEOUT: &str = "IPF_TIMEOUT";
/// Environment variable holding the page size used for full-table fetches
pub const ENV_PAGE_SIZE: &str = "IPF_PAGE_SIZE";

/// Client configuration
///
/// `url` and `token` are optional here so that a partially filled file can
/// be completed from the environment; [`Config::validate`] rejects a
/// configuration where either is still missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Instance base URL, e.g. `https://ipfabric.example.com`
    #[serde(default)]
    pub url: Option<String>,

    /// API token sent as `X-API-Token`
    #[serde(default)]
    pub token: Option<String>,

    /// Default snapshot selector: `$last`, `$prev`, `$lastLocked` or an ID
    #[serde(default = "default_snapshot")]
    pub snapshot: String,

    /// Verify the server's TLS certificate
    #[serde(default = "default_verify_tls")]
    pub verify_tls: bool,

    /// Per-request timeout (seconds)
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Rows per page when fetching a whole table
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_snapshot() -> String {
    "$last".to_string()
}

fn default_verify_tls() -> bool {
    true
}

fn default_timeout() -> u64 {
    30
}

fn default_page_size() -> usize {
    MAX_PAGE_SIZE
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: None,
            token: None,
            snapshot: default_snapshot(),
            verify_tls: default_verify_tls(),
            timeout_seconds: default_timeout(),
            page_size: default_page_size(),
        }
    }
}

impl Config {
    /// Build a configuration from explicit credentials, falling back to the
    /// environment for any that are `None`
    ///
    /// # Examples
    ///
    /// ```
    /// use ipfabric_client::config::Config;
    ///
    /// let config = Config::new(Some("https://ipf.example.com"), Some("secret"));
    /// assert_eq!(config.url.as_deref(), Some("https://ipf.example.com"));
    /// assert!(config.validate().is_ok());
    /// ```
    pub fn new(url: Option<&str>, token: Option<&str>) -> Self {
        let mut config = Self::default();
        config.apply_env_vars();
        if let Some(url) = url {
            config.url = Some(url.to_string());
        }
        if let Some(token) = token {
            config.token = Some(token.to_string());
        }
        config
    }

    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file; `None` uses [`default_config_path`]
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: Option<&str>, cli: &crate::cli::Cli) -> Result<Self> {
        let path = match path {
            Some(p) => Some(PathBuf::from(p)),
            None => default_config_path(),
        };

        let mut config = match path {
            Some(ref p) if p.exists() => Self::from_file(p)?,
            Some(ref p) => {
                tracing::warn!("Config file not found at {}, using defaults", p.display());
                Self::default()
            }
            None => Self::default(),
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| IpfError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| IpfError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(url) = std::env::var(ENV_URL) {
            self.url = Some(url);
        }

        if let Ok(token) = std::env::var(ENV_TOKEN) {
            self.token = Some(token);
        }

        if let Ok(snapshot) = std::env::var(ENV_SNAPSHOT) {
            self.snapshot = snapshot;
        }

        if let Ok(verify) = std::env::var(ENV_VERIFY) {
            match verify.to_lowercase().as_str() {
                "1" | "true" | "yes" => self.verify_tls = true,
                "0" | "false" | "no" => self.verify_tls = false,
                _ => tracing::warn!("Invalid {}: {}", ENV_VERIFY, verify),
            }
        }

        if let Ok(timeout) = std::env::var(ENV_TIMEOUT) {
            if let Ok(value) = timeout.parse() {
                self.timeout_seconds = value;
            } else {
                tracing::warn!("Invalid {}: {}", ENV_TIMEOUT, timeout);
            }
        }

        if let Ok(page_size) = std::env::var(ENV_PAGE_SIZE) {
            if let Ok(value) = page_size.parse() {
                self.page_size = value;
            } else {
                tracing::warn!("Invalid {}: {}", ENV_PAGE_SIZE, page_size);
            }
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(url) = &cli.url {
            self.url = Some(url.clone());
        }
        if let Some(token) = &cli.token {
            self.token = Some(token.clone());
        }
        if let Some(snapshot) = &cli.snapshot {
            self.snapshot = snapshot.clone();
        }
        if cli.insecure {
            self.verify_tls = false;
        }
    }

    /// Base URL and token, or a configuration error naming what is missing
    pub fn credentials(&self) -> Result<(&str, &str)> {
        let url = self
            .url
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| {
                IpfError::Config(format!("base URL not provided or {} not set", ENV_URL))
            })?;
        let token = self
            .token
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| {
                IpfError::Config(format!("token not provided or {} not set", ENV_TOKEN))
            })?;
        Ok((url, token))
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if credentials are missing or any value is out of range
    pub fn validate(&self) -> Result<()> {
        self.credentials()?;

        if self.timeout_seconds == 0 {
            return Err(
                IpfError::Config("timeout_seconds must be greater than 0".to_string()).into(),
            );
        }

        if self.page_size == 0 {
            return Err(IpfError::Config("page_size must be greater than 0".to_string()).into());
        }

        if self.page_size > MAX_PAGE_SIZE {
            return Err(IpfError::Config(format!(
                "page_size must be less than or equal to {}",
                MAX_PAGE_SIZE
            ))
            .into());
        }

        if self.snapshot.trim().is_empty() {
            return Err(IpfError::Config("snapshot cannot be empty".to_string()).into());
        }

        Ok(())
    }
}

/// Default configuration file location in the user's config directory
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("io", "ipfabric", "ipfabric-client")
        .map(|dirs| dirs.config_dir().join("config.yaml"))
}

//! CLI configuration management
//!
//! Handles loading and saving CLI-specific configuration (`cli.toml`).

use anyhow::{Context, Result};
use fanpanel_core::{default_config_dir, default_fan_config_path};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const MAX_TIMEOUT_SECS: u64 = 300;
const MAX_POLL_INTERVAL_SECS: u64 = 3600;

/// CLI configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CliConfig {
    /// Device RPC server URL
    pub server_url: String,

    /// Default output format
    pub output_format: String,

    /// Enable verbose logging by default
    pub verbose: bool,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Pause between status refreshes in seconds
    pub poll_interval: u64,

    /// Fan settings file (default: `~/.config/fanpanel/fan.toml`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fan_config: Option<PathBuf>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:8080".to_string(),
            output_format: "table".to_string(),
            verbose: false,
            timeout: 10,
            poll_interval: 3,
            fan_config: None,
        }
    }
}

impl CliConfig {
    /// Default location of `cli.toml`
    pub fn default_path() -> PathBuf {
        default_config_dir().join("cli.toml")
    }

    /// Load configuration from a file. A missing file is an error here;
    /// [`ConfigBuilder::with_config_file`] decides whether that matters.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read CLI config file {}", path.display()))?;

        toml::from_str(&content).context("Failed to parse CLI config file")
    }

    /// Save configuration to file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize CLI config")?;

        std::fs::write(path, content).context("Failed to write CLI config file")?;

        Ok(())
    }

    /// Fan settings file in effect
    pub fn fan_config_path(&self) -> PathBuf {
        self.fan_config
            .clone()
            .unwrap_or_else(default_fan_config_path)
    }

    /// Create a new builder for constructing configuration
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }
}

/// Builder for CLI configuration with validation and priority chain support
///
/// Priority chain (lowest to highest):
/// 1. Defaults
/// 2. Config file
/// 3. Environment variables
/// 4. CLI arguments
///
/// Apply the layers in that order; each layer overwrites what came before.
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    server_url: Option<String>,
    output_format: Option<String>,
    verbose: Option<bool>,
    timeout: Option<u64>,
    poll_interval: Option<u64>,
    fan_config: Option<PathBuf>,
}

impl ConfigBuilder {
    /// Create a new configuration builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set server URL (with validation)
    pub fn with_server_url(mut self, url: impl Into<String>) -> Result<Self> {
        let url = url.into();
        Self::validate_url(&url)?;
        self.server_url = Some(url);
        Ok(self)
    }

    /// Set output format (with validation)
    pub fn with_output_format(mut self, format: impl Into<String>) -> Result<Self> {
        let format = format.into();
        Self::validate_output_format(&format)?;
        self.output_format = Some(format);
        Ok(self)
    }

    /// Set verbose flag
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = Some(verbose);
        self
    }

    /// Set timeout (with validation)
    pub fn with_timeout(mut self, timeout: u64) -> Result<Self> {
        Self::validate_timeout(timeout)?;
        self.timeout = Some(timeout);
        Ok(self)
    }

    /// Set poll interval (with validation)
    pub fn with_poll_interval(mut self, seconds: u64) -> Result<Self> {
        Self::validate_poll_interval(seconds)?;
        self.poll_interval = Some(seconds);
        Ok(self)
    }

    pub fn with_fan_config(mut self, path: impl Into<PathBuf>) -> Self {
        self.fan_config = Some(path.into());
        self
    }

    /// Layer a config file over the current values.
    ///
    /// `None` means the default path; a missing default file is fine, a
    /// missing explicit file is not. Invalid values in the file are errors.
    pub fn with_config_file(self, path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (CliConfig::default_path(), false),
        };

        if !path.exists() {
            if explicit {
                return Err(anyhow::anyhow!(
                    "Config file {} does not exist",
                    path.display()
                ));
            }
            return Ok(self);
        }

        let config = CliConfig::load_from(&path)?;
        let mut builder = self
            .with_server_url(config.server_url)?
            .with_output_format(config.output_format)?
            .with_verbose(config.verbose)
            .with_timeout(config.timeout)?
            .with_poll_interval(config.poll_interval)?;
        if let Some(fan_config) = config.fan_config {
            builder = builder.with_fan_config(fan_config);
        }
        Ok(builder)
    }

    /// Apply environment variable overrides. Invalid values are ignored.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(server_url) = std::env::var("FANPANEL_SERVER") {
            if Self::validate_url(&server_url).is_ok() {
                self.server_url = Some(server_url);
            }
        }

        if let Ok(format) = std::env::var("FANPANEL_FORMAT") {
            if Self::validate_output_format(&format).is_ok() {
                self.output_format = Some(format);
            }
        }

        if let Ok(verbose) = std::env::var("FANPANEL_VERBOSE") {
            self.verbose = Some(verbose.to_lowercase() == "true" || verbose == "1");
        }

        if let Ok(timeout) = std::env::var("FANPANEL_TIMEOUT") {
            if let Ok(timeout) = timeout.parse() {
                if Self::validate_timeout(timeout).is_ok() {
                    self.timeout = Some(timeout);
                }
            }
        }

        if let Ok(interval) = std::env::var("FANPANEL_POLL_INTERVAL") {
            if let Ok(interval) = interval.parse() {
                if Self::validate_poll_interval(interval).is_ok() {
                    self.poll_interval = Some(interval);
                }
            }
        }

        if let Ok(path) = std::env::var("FANPANEL_FAN_CONFIG") {
            if !path.is_empty() {
                self.fan_config = Some(PathBuf::from(path));
            }
        }

        self
    }

    /// Build the final configuration with validation
    pub fn build(self) -> Result<CliConfig> {
        let defaults = CliConfig::default();

        let server_url = self.server_url.unwrap_or(defaults.server_url);
        let output_format = self.output_format.unwrap_or(defaults.output_format);
        let timeout = self.timeout.unwrap_or(defaults.timeout);
        let poll_interval = self.poll_interval.unwrap_or(defaults.poll_interval);

        // Validate final values
        Self::validate_url(&server_url)?;
        Self::validate_output_format(&output_format)?;
        Self::validate_timeout(timeout)?;
        Self::validate_poll_interval(poll_interval)?;

        Ok(CliConfig {
            server_url,
            output_format,
            verbose: self.verbose.unwrap_or(defaults.verbose),
            timeout,
            poll_interval,
            fan_config: self.fan_config,
        })
    }

    /// Validate URL format
    fn validate_url(url: &str) -> Result<()> {
        if url.is_empty() {
            return Err(anyhow::anyhow!("Server URL cannot be empty"));
        }

        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(anyhow::anyhow!(
                "Server URL must start with http:// or https://"
            ));
        }

        Ok(())
    }

    /// Validate output format
    fn validate_output_format(format: &str) -> Result<()> {
        match format {
            "table" | "json" => Ok(()),
            _ => Err(anyhow::anyhow!(
                "Invalid output format '{}'. Must be 'table' or 'json'",
                format
            )),
        }
    }

    /// Validate timeout value
    fn validate_timeout(timeout: u64) -> Result<()> {
        if timeout == 0 {
            return Err(anyhow::anyhow!("Timeout must be greater than 0"));
        }

        if timeout > MAX_TIMEOUT_SECS {
            return Err(anyhow::anyhow!(
                "Timeout must be less than or equal to {} seconds",
                MAX_TIMEOUT_SECS
            ));
        }

        Ok(())
    }

    fn validate_poll_interval(seconds: u64) -> Result<()> {
        if !(1..=MAX_POLL_INTERVAL_SECS).contains(&seconds) {
            return Err(anyhow::anyhow!(
                "Poll interval must be between 1 and {} seconds",
                MAX_POLL_INTERVAL_SECS
            ));
        }
        Ok(())
    }
}

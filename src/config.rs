//! Configuration file management for sancheck.
//!
//! This module handles loading, parsing, and merging configuration from TOML
//! files and command-line arguments. Settings can be specified in multiple
//! places with clear precedence rules.
//!
//! # Configuration Precedence
//!
//! 1. Default values (lowest priority)
//! 2. Configuration file (sancheck.toml or specified with --config)
//! 3. Command-line arguments (highest priority)
//!
//! # Example Configuration File
//!
//! ```toml
//! hostname = "internal.example.com"
//! port = 8443
//! json = false
//! no_validate = false
//!
//! [prometheus]
//! enabled = true
//! address = "http://localhost:9091"
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default config file looked up in the working directory when --config is
/// not given.
pub const DEFAULT_CONFIG_FILE: &str = "sancheck.toml";

/// Main configuration structure for sancheck.
///
/// All fields are optional to support partial configuration and merging.
/// Missing values will be filled in by defaults or overridden by CLI
/// arguments.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    /// Hostname to connect to and to validate against the SANs
    pub hostname: Option<String>,
    /// TCP port to dial
    pub port: Option<u16>,
    /// Render the certificate summary as JSON instead of text
    pub json: Option<bool>,
    /// Omit the Server Name Indication value from the handshake
    pub no_server_name: Option<bool>,
    /// Skip the hostname-authorization check entirely
    pub no_validate: Option<bool>,
    /// Prometheus configuration
    pub prometheus: Option<PrometheusConfig>,
}

/// Prometheus integration configuration.
///
/// Controls whether metrics are pushed to a Prometheus Push Gateway
/// and specifies the gateway address.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PrometheusConfig {
    /// Enable prometheus metrics pushing
    pub enabled: Option<bool>,
    /// Prometheus push gateway address (e.g., "http://localhost:9091")
    pub address: Option<String>,
}

impl Config {
    /// Loads configuration from a TOML file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the TOML configuration file
    ///
    /// # Returns
    ///
    /// * `Ok(Config)` - Successfully parsed configuration
    /// * `Err(ConfigError::Io)` - File could not be read
    /// * `Err(ConfigError::Parse)` - File contains invalid TOML
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io(e.to_string()))?;

        let config: Config =
            toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;

        Ok(config)
    }

    /// Creates a default configuration with sensible defaults.
    ///
    /// # Default Values
    ///
    /// - `hostname`: None (must be provided)
    /// - `port`: 443
    /// - `json`: false
    /// - `no_server_name`: false
    /// - `no_validate`: false
    /// - `prometheus.enabled`: false
    /// - `prometheus.address`: "http://localhost:9091"
    pub fn default() -> Self {
        Config {
            hostname: None,
            port: Some(443),
            json: Some(false),
            no_server_name: Some(false),
            no_validate: Some(false),
            prometheus: Some(PrometheusConfig {
                enabled: Some(false),
                address: Some("http://localhost:9091".to_string()),
            }),
        }
    }

    /// Merges this configuration with another, prioritizing the other's
    /// values.
    ///
    /// For each field, if the `other` config has a value (Some), it overrides
    /// this config's value. If the `other` value is None, keeps the current
    /// value.
    pub fn merge_with(mut self, other: Config) -> Self {
        if other.hostname.is_some() {
            self.hostname = other.hostname;
        }
        if other.port.is_some() {
            self.port = other.port;
        }
        if other.json.is_some() {
            self.json = other.json;
        }
        if other.no_server_name.is_some() {
            self.no_server_name = other.no_server_name;
        }
        if other.no_validate.is_some() {
            self.no_validate = other.no_validate;
        }
        if let Some(other_prom) = other.prometheus {
            if let Some(ref mut self_prom) = self.prometheus {
                if other_prom.enabled.is_some() {
                    self_prom.enabled = other_prom.enabled;
                }
                if other_prom.address.is_some() {
                    self_prom.address = other_prom.address;
                }
            } else {
                self.prometheus = Some(other_prom);
            }
        }
        self
    }

    /// Creates a Config from command-line arguments for merging.
    ///
    /// Converts CLI arguments into a Config structure that can be merged with
    /// file-based and default configurations. Only provided arguments (Some
    /// values) will override other configurations.
    pub fn from_cli_args(
        hostname: Option<String>,
        port: Option<u16>,
        json: Option<bool>,
        no_server_name: Option<bool>,
        no_validate: Option<bool>,
        prometheus: Option<bool>,
        prometheus_address: Option<String>,
    ) -> Self {
        Config {
            hostname,
            port,
            json,
            no_server_name,
            no_validate,
            prometheus: Some(PrometheusConfig {
                enabled: prometheus,
                address: prometheus_address,
            }),
        }
    }

    /// Generates an example configuration file in TOML format.
    ///
    /// Creates a sample configuration with all available options set to
    /// example values. Useful for bootstrapping a new configuration file.
    pub fn example_toml() -> String {
        let example = Config {
            hostname: Some("internal.example.com".to_string()),
            port: Some(8443),
            json: Some(false),
            no_server_name: Some(false),
            no_validate: Some(false),
            prometheus: Some(PrometheusConfig {
                enabled: Some(true),
                address: Some("http://localhost:9091".to_string()),
            }),
        };

        toml::to_string_pretty(&example)
            .unwrap_or_else(|_| "# Error generating example".to_string())
    }
}

/// Errors that can occur during configuration loading and parsing.
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error (file not found, permission denied, etc.)
    Io(String),
    /// TOML parsing error (invalid syntax, type mismatch, etc.)
    Parse(String),
    /// Validation error (missing required fields, invalid values, etc.)
    Validation(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(msg) => write!(f, "IO Error: {}", msg),
            ConfigError::Parse(msg) => write!(f, "Parse Error: {}", msg),
            ConfigError::Validation(msg) => write!(f, "Validation Error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

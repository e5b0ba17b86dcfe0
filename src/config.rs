//! Configuration management for hadoop-jmx-exporter
//!
//! Handles loading and validating the exporter's YAML settings file. The
//! Ambari address itself lives in a separate, externally generated connection
//! file (see [`crate::ambari::ClusterConnection`]); this file only points at it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::discovery::{JmxEndpoint, Role, RolePorts};

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Error reading the configuration file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Error parsing the configuration file
    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// Configuration validation error
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Management API access
    #[serde(default)]
    pub ambari: AmbariConfig,

    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Cluster to monitor; the first listed cluster when unset
    #[serde(default)]
    pub cluster: Option<String>,

    /// Per-role JMX URLs that replace discovery
    #[serde(default)]
    pub targets: TargetOverrides,

    /// Per-role JMX port overrides
    #[serde(default)]
    pub ports: RolePorts,
}

/// Management API access configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmbariConfig {
    /// Connection file written by the external templating tool
    #[serde(default = "default_connection_file")]
    pub connection_file: PathBuf,

    /// Username for basic auth
    #[serde(default = "default_username")]
    pub username: String,

    /// Password for basic auth
    #[serde(default = "default_password")]
    pub password: String,

    /// Request timeout in milliseconds, applied to every HTTP call
    #[serde(default = "default_timeout")]
    pub timeout_ms: u64,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Metrics endpoint path
    #[serde(default = "default_metrics_path")]
    pub path: String,

    /// Server bind address
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

/// Role → list of JMX URLs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetOverrides(BTreeMap<Role, Vec<String>>);

impl TargetOverrides {
    /// Overrides for `role`; empty when discovery should be used
    pub fn get(&self, role: Role) -> &[String] {
        self.0.get(&role).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Replace the overrides for `role`
    pub fn set(&mut self, role: Role, urls: Vec<String>) {
        if urls.is_empty() {
            self.0.remove(&role);
        } else {
            self.0.insert(role, urls);
        }
    }

    /// True when every discoverable role has an override
    pub fn covers_all_discoverable(&self) -> bool {
        Role::DISCOVERABLE.iter().all(|r| !self.get(*r).is_empty())
    }

    /// Parsed endpoints for `role`
    pub fn endpoints(&self, role: Role) -> Result<Vec<JmxEndpoint>, ConfigError> {
        self.get(role)
            .iter()
            .map(|raw| {
                JmxEndpoint::parse(raw).map_err(|e| {
                    ConfigError::ValidationError(format!("targets.{}: {}", role, e))
                })
            })
            .collect()
    }
}

// Default value functions
fn default_connection_file() -> PathBuf {
    PathBuf::from("config/config.conf")
}

fn default_username() -> String {
    "admin".to_string()
}

fn default_password() -> String {
    "admin".to_string()
}

fn default_timeout() -> u64 {
    5000
}

fn default_port() -> u16 {
    9131
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

impl Default for AmbariConfig {
    fn default() -> Self {
        Self {
            connection_file: default_connection_file(),
            username: default_username(),
            password: default_password(),
            timeout_ms: default_timeout(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            path: default_metrics_path(),
            bind_address: default_bind_address(),
        }
    }
}

/// Paths served by the router besides the metrics path
const RESERVED_PATHS: &[&str] = &["/", "/health", "/targets"];

impl Config {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, parsed or validated
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file, falling back to defaults if not found
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::warn!(
                path = %path.display(),
                "Config file not found, using defaults"
            );
            return Ok(Self::default());
        }

        Self::load(path)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        if !self.server.path.starts_with('/') {
            return Err(ConfigError::ValidationError(
                "Metrics path must start with '/'".to_string(),
            ));
        }

        if RESERVED_PATHS.contains(&self.server.path.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "Metrics path must not be one of {:?}",
                RESERVED_PATHS
            )));
        }

        if self.ambari.timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "ambari.timeout_ms must be greater than 0".to_string(),
            ));
        }

        if let Some((role, _)) = self.ports.overrides().find(|(_, port)| *port == 0) {
            return Err(ConfigError::ValidationError(format!(
                "ports.{} must be greater than 0",
                role
            )));
        }

        for role in Role::ALL {
            self.targets.endpoints(role)?;
        }

        Ok(())
    }
}

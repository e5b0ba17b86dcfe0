//! Management API address from the externally generated connection file
//!
//! The file is produced by a templating tool outside this crate and looks like:
//!
//! ```yaml
//! ip: [10.0.0.5, 10.0.0.6]
//! proxy_port: 8081
//! port: [8080]
//! ```

use std::fmt;
use std::path::Path;

use serde::Deserialize;

use crate::config::ConfigError;

/// A port written either as a YAML number or a string
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum PortValue {
    Number(u16),
    Text(String),
}

impl PortValue {
    fn to_port(&self, field: &str) -> Result<u16, ConfigError> {
        let port = match self {
            PortValue::Number(n) => *n,
            PortValue::Text(s) => s.trim().parse::<u16>().map_err(|_| {
                ConfigError::ValidationError(format!("'{}' is not a valid {}", s, field))
            })?,
        };
        if port == 0 {
            return Err(ConfigError::ValidationError(format!(
                "{} must be greater than 0",
                field
            )));
        }
        Ok(port)
    }
}

/// Parsed connection file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClusterConnection {
    #[serde(default)]
    pub ip: Vec<String>,

    #[serde(default)]
    pub proxy_port: Option<PortValue>,

    #[serde(default)]
    pub port: Vec<PortValue>,
}

/// Base URL of the management API, e.g. `http://10.0.0.5:8080`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagementEndpoint(String);

impl ManagementEndpoint {
    /// Wrap an already known base URL; a trailing `/` is dropped
    pub fn new(base_url: &str) -> Self {
        Self(base_url.trim_end_matches('/').to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ManagementEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl ClusterConnection {
    /// Read and parse the connection file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&contents)
    }

    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(contents)?)
    }

    /// Resolve the management endpoint
    ///
    /// `proxy_port` wins over the first entry of `port`; with neither, or with
    /// no `ip`, the connection is unusable.
    pub fn resolve(&self) -> Result<ManagementEndpoint, ConfigError> {
        let ip = self
            .ip
            .first()
            .map(|ip| ip.trim())
            .filter(|ip| !ip.is_empty())
            .ok_or_else(|| {
                ConfigError::ValidationError("No available ip in config file".to_string())
            })?;

        let port = match (&self.proxy_port, self.port.first()) {
            (Some(proxy_port), _) => proxy_port.to_port("proxy_port")?,
            (None, Some(port)) => port.to_port("port")?,
            (None, None) => {
                return Err(ConfigError::ValidationError(
                    "No available port in config file".to_string(),
                ))
            }
        };

        Ok(ManagementEndpoint(format!("http://{}:{}", ip, port)))
    }
}

//! CLI argument parsing for hadoop-jmx-exporter
//!
//! This module provides the command-line interface using clap derive macros.
//!
//! # Options
//!
//! - `--config` / `-c`: Settings file path (default: config.yaml, env: HADOOP_EXPORTER_CONFIG)
//! - `--connection-file`: Ambari connection file (env: HADOOP_EXPORTER_CONNECTION_FILE)
//! - `--cluster`: Cluster to monitor (env: HADOOP_EXPORTER_CLUSTER)
//! - `--namenode-url`, `--resourcemanager-url`, `--hbase-url`, `--datanode-url`,
//!   `--journalnode-url`, `--mapreduce2-url`, `--hive-url`: per-role JMX URLs that
//!   replace discovery (repeatable)
//! - `--metrics-path`: Metrics endpoint path (env: HADOOP_EXPORTER_METRICS_PATH)
//! - `--address`: Server bind address (env: HADOOP_EXPORTER_ADDRESS)
//! - `--port` / `-p`: Server port (env: HADOOP_EXPORTER_PORT)
//! - `--discover`: Print the resolved targets and exit
//! - `--output-format`: Output format for --discover (text/json/yaml)
//! - `--log-level` / `-l`: Log level (trace/debug/info/warn/error, env: HADOOP_EXPORTER_LOG_LEVEL)
//!
//! # Precedence
//!
//! Configuration values are resolved in the following order (highest to lowest priority):
//! 1. CLI arguments
//! 2. Environment variables
//! 3. Configuration file
//! 4. Default values

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::config::Config;
use crate::discovery::Role;

/// hadoop-jmx-exporter - Hadoop JMX metrics exporter
///
/// Discovers the active NameNode, ResourceManager and HBase Master, plus
/// DataNodes, JournalNodes and history servers, through Ambari and exports
/// their JMX metrics in Prometheus format.
#[derive(Parser, Debug)]
#[command(name = "hadoop-jmx-exporter")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to configuration file
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config.yaml",
        env = "HADOOP_EXPORTER_CONFIG"
    )]
    pub config: PathBuf,

    /// Ambari connection file generated by the templating tool (overrides config file)
    #[arg(long, value_name = "FILE", env = "HADOOP_EXPORTER_CONNECTION_FILE")]
    pub connection_file: Option<PathBuf>,

    /// Hadoop cluster to monitor (default: first cluster listed by Ambari)
    #[arg(long, value_name = "CLUSTER", env = "HADOOP_EXPORTER_CLUSTER")]
    pub cluster: Option<String>,

    /// NameNode JMX URL, skips discovery of the active NameNode
    #[arg(long, value_name = "URL")]
    pub namenode_url: Vec<String>,

    /// ResourceManager JMX URL, skips discovery of the active ResourceManager
    #[arg(long, value_name = "URL")]
    pub resourcemanager_url: Vec<String>,

    /// HBase Master JMX URL, skips discovery of the active HBase Master
    #[arg(long, value_name = "URL")]
    pub hbase_url: Vec<String>,

    /// DataNode JMX URL (repeatable), skips DataNode discovery
    #[arg(long, value_name = "URL")]
    pub datanode_url: Vec<String>,

    /// JournalNode JMX URL (repeatable), skips JournalNode discovery
    #[arg(long, value_name = "URL")]
    pub journalnode_url: Vec<String>,

    /// MapReduce2 history server JMX URL (repeatable)
    #[arg(long, value_name = "URL")]
    pub mapreduce2_url: Vec<String>,

    /// Hive JMX URL (repeatable); Hive is never discovered
    #[arg(long, value_name = "URL")]
    pub hive_url: Vec<String>,

    /// Metrics endpoint path (overrides config file)
    #[arg(long, value_name = "PATH", env = "HADOOP_EXPORTER_METRICS_PATH")]
    pub metrics_path: Option<String>,

    /// Server bind address (overrides config file)
    /// Supported values: IP addresses (0.0.0.0, 127.0.0.1, ::1) or "localhost"
    #[arg(long, value_name = "ADDRESS", env = "HADOOP_EXPORTER_ADDRESS")]
    pub address: Option<String>,

    /// Server port (overrides config file)
    #[arg(short, long, value_name = "PORT", env = "HADOOP_EXPORTER_PORT")]
    pub port: Option<u16>,

    /// Resolve targets, print them and exit
    #[arg(long)]
    pub discover: bool,

    /// Output format for --discover
    #[arg(long, value_enum, default_value = "text")]
    pub output_format: OutputFormat,

    /// Log level
    #[arg(
        short,
        long,
        value_enum,
        default_value = "info",
        env = "HADOOP_EXPORTER_LOG_LEVEL"
    )]
    pub log_level: LogLevel,
}

impl Cli {
    /// URLs given on the command line for `role`
    pub fn role_urls(&self, role: Role) -> &[String] {
        match role {
            Role::NameNode => &self.namenode_url,
            Role::ResourceManager => &self.resourcemanager_url,
            Role::HBaseMaster => &self.hbase_url,
            Role::DataNode => &self.datanode_url,
            Role::JournalNode => &self.journalnode_url,
            Role::HistoryServer => &self.mapreduce2_url,
            Role::Hive => &self.hive_url,
        }
    }

    /// Apply command-line overrides on top of `config`
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(path) = &self.connection_file {
            config.ambari.connection_file = path.clone();
        }
        if let Some(cluster) = &self.cluster {
            config.cluster = Some(cluster.clone());
        }
        for role in Role::ALL {
            let urls = self.role_urls(role);
            if !urls.is_empty() {
                config.targets.set(role, urls.to_vec());
            }
        }
        if let Some(path) = &self.metrics_path {
            config.server.path = path.clone();
        }
        if let Some(address) = &self.address {
            config.server.bind_address = address.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
    }
}

/// Log level options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// Trace level - most verbose
    Trace,
    /// Debug level
    Debug,
    /// Info level - default
    Info,
    /// Warn level
    Warn,
    /// Error level - least verbose
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

/// Output format options for --discover
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Yaml => write!(f, "yaml"),
        }
    }
}

//! hadoop-jmx-exporter library
//!
//! This crate discovers the active endpoints of a Hadoop cluster through the
//! Ambari management API, fetches their JMX metrics and exports them in
//! Prometheus format.

pub mod ambari;
pub mod cli;
pub mod collector;
pub mod config;
pub mod discovery;
pub mod error;
pub mod exposition;
pub mod server;

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the logging subsystem
///
/// # Arguments
/// * `level` - Log level string (trace, debug, info, warn, error)
///
/// # Errors
/// Returns an error if the logging system fails to initialize
pub fn init_logging(level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

//! hadoop-jmx-exporter - Hadoop JMX metrics exporter
//!
//! This binary resolves the Hadoop endpoints to poll through Ambari and
//! serves their JMX metrics on a Prometheus-compatible endpoint.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use hadoop_jmx_exporter::cli::{Cli, OutputFormat};
use hadoop_jmx_exporter::collector::{HttpClient, MetricsFetcher};
use hadoop_jmx_exporter::config::Config;
use hadoop_jmx_exporter::discovery::{self, TargetSet};
use hadoop_jmx_exporter::server::{self, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    hadoop_jmx_exporter::init_logging(&cli.log_level.to_string())?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting hadoop-jmx-exporter"
    );

    // Load configuration
    let mut config = Config::load_or_default(&cli.config)?;
    cli.apply_to(&mut config);
    config.validate()?;

    let http = HttpClient::new(config.ambari.timeout_ms)?
        .with_auth(&config.ambari.username, &config.ambari.password);

    let targets = discovery::discover_targets(&config, &http)
        .await
        .context("Target discovery failed")?;

    if cli.discover {
        print_targets(&targets, cli.output_format)?;
        return Ok(());
    }

    if targets.is_empty() {
        warn!("No JMX endpoint resolved; only exporter metrics will be served");
    }

    let state = AppState::new(config, MetricsFetcher::new(http), targets);
    server::run(state).await?;

    Ok(())
}

fn print_targets(targets: &TargetSet, format: OutputFormat) -> Result<()> {
    let output = match format {
        OutputFormat::Text => targets.to_text(),
        OutputFormat::Json => serde_json::to_string_pretty(targets)? + "\n",
        OutputFormat::Yaml => serde_yaml::to_string(targets)?,
    };
    print!("{}", output);
    Ok(())
}

//! HTTP request handlers
//!
//! Contains handlers for all HTTP endpoints.

use std::time::Instant;

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
    Json,
};
use serde::Serialize;
use tracing::{debug, instrument};

use super::AppState;
use crate::discovery::TargetSet;
use crate::exposition::{samples_from_payload, target_up, MetricType, Sample, TextFormatter};

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    /// Health status
    status: String,
    /// Application version
    version: String,
    /// Number of JMX endpoints polled per scrape
    targets: usize,
}

/// Root endpoint - displays basic info
pub async fn root(State(state): State<AppState>) -> Html<String> {
    let html = format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>Hadoop JMX Exporter</title>
</head>
<body>
    <h1>Hadoop JMX Exporter</h1>
    <p>Version: {}</p>
    <p>Cluster: {}</p>
    <ul>
        <li><a href="/health">Health Check</a></li>
        <li><a href="/targets">Targets</a></li>
        <li><a href="{}">Metrics</a></li>
    </ul>
</body>
</html>"#,
        env!("CARGO_PKG_VERSION"),
        state.targets.cluster.as_deref().unwrap_or("-"),
        state.config.server.path
    );
    Html(html)
}

/// Health check endpoint
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        targets: state.targets.targets.len(),
    })
}

/// Targets endpoint - the endpoints resolved at startup
pub async fn targets(State(state): State<AppState>) -> Json<TargetSet> {
    Json(state.targets.as_ref().clone())
}

/// Metrics endpoint - fetches every target's `/jmx` and returns Prometheus format
#[instrument(skip(state), name = "metrics_handler")]
pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    let start = Instant::now();
    let cluster = state.targets.cluster.as_deref();

    let mut samples = Vec::new();
    let mut up = Vec::with_capacity(state.targets.targets.len());

    for target in &state.targets.targets {
        match state.fetcher.fetch(target.endpoint.as_str()).await {
            Ok(Some(payload)) => {
                samples.extend(samples_from_payload(target, cluster, &payload));
                up.push(target_up(target, true));
            }
            Ok(None) | Err(_) => up.push(target_up(target, false)),
        }
    }

    let failed = up.iter().filter(|s| s.value == 0.0).count();
    let scraped = samples.len();

    samples.extend(up);
    samples.push(
        Sample::new("hadoop_exporter_info", 1.0)
            .with_type(MetricType::Gauge)
            .with_help("hadoop-jmx-exporter information")
            .with_label("version", env!("CARGO_PKG_VERSION")),
    );
    samples.push(
        Sample::new(
            "hadoop_exporter_scrape_duration_seconds",
            start.elapsed().as_secs_f64(),
        )
        .with_type(MetricType::Gauge)
        .with_help("Time spent scraping all JMX endpoints"),
    );

    let output = TextFormatter::new().format(&samples);

    debug!(
        duration_ms = start.elapsed().as_millis() as u64,
        metrics_count = scraped,
        failed_targets = failed,
        "Metrics collection complete"
    );

    (
        StatusCode::OK,
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        output,
    )
}

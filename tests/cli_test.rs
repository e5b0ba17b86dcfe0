//! CLI integration tests
//!
//! Tests for the command-line interface using assert_cmd.
//!
//! These tests verify:
//! - Help and version flags
//! - Configuration validation
//! - Discover mode with explicit targets
//! - Error handling for missing or unusable connection files

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

/// Get a command for the hadoop-jmx-exporter binary
#[allow(deprecated)]
fn cmd() -> Command {
    let mut cmd =
        Command::cargo_bin("hadoop-jmx-exporter").expect("Failed to find hadoop-jmx-exporter binary");
    cmd.env_remove("RUST_LOG");
    cmd
}

/// Helper to create a temporary file with given content
fn create_temp_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write file");
    file.flush().expect("Failed to flush");
    file
}

/// Arguments that override every discoverable role
fn all_role_urls() -> Vec<&'static str> {
    vec![
        "--namenode-url",
        "http://nn1:50070/jmx",
        "--resourcemanager-url",
        "http://rm1:8088/jmx",
        "--hbase-url",
        "http://hm1:16010/jmx",
        "--datanode-url",
        "http://dn1:1022/jmx",
        "--datanode-url",
        "http://dn2:1022/jmx",
        "--journalnode-url",
        "http://jn1:8480/jmx",
        "--mapreduce2-url",
        "http://hs1:19888/jmx",
    ]
}

/// Test --help flag displays usage information
#[test]
fn test_help_flag() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:").or(predicate::str::contains("usage:")))
        .stdout(predicate::str::contains("--namenode-url"))
        .stdout(predicate::str::contains("--discover"));
}

/// Test --version flag displays version
#[test]
fn test_version_flag() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

/// Test that discover mode prints explicitly configured targets without Ambari
#[test]
fn test_discover_with_explicit_targets() {
    cmd()
        .args(["-c", "/nonexistent/config.yaml"])
        .args(["--connection-file", "/nonexistent/config.conf"])
        .args(all_role_urls())
        .args(["--hive-url", "http://hive1:10002/jmx"])
        .arg("--discover")
        .timeout(std::time::Duration::from_secs(5))
        .assert()
        .success()
        .stdout(predicate::str::contains("http://nn1:50070/jmx"))
        .stdout(predicate::str::contains(
            "http://dn1:1022/jmx, http://dn2:1022/jmx",
        ))
        .stdout(predicate::str::contains("http://hive1:10002/jmx"));
}

/// Test JSON output of discover mode
#[test]
fn test_discover_json_output() {
    let output = cmd()
        .args(["-c", "/nonexistent/config.yaml"])
        .args(all_role_urls())
        .args(["--cluster", "prod", "--discover", "--output-format", "json"])
        .timeout(std::time::Duration::from_secs(5))
        .output()
        .expect("Failed to run binary");

    assert!(output.status.success());
    let parsed: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    assert_eq!(parsed["cluster"], "prod");
    assert_eq!(parsed["targets"].as_array().unwrap().len(), 7);
    assert_eq!(parsed["targets"][0]["role"], "namenode");
    assert_eq!(parsed["targets"][0]["source"], "configured");
}

/// Test that a missing connection file is fatal
#[test]
fn test_missing_connection_file() {
    cmd()
        .args(["-c", "/nonexistent/config.yaml"])
        .args(["--connection-file", "/nonexistent/config.conf"])
        .arg("--discover")
        .timeout(std::time::Duration::from_secs(5))
        .assert()
        .failure();
}

/// Test that a connection file without a port is fatal
#[test]
fn test_connection_file_without_port() {
    let connection = create_temp_file("ip:\n  - 10.0.0.5\n");

    cmd()
        .args(["-c", "/nonexistent/config.yaml"])
        .arg("--connection-file")
        .arg(connection.path())
        .arg("--discover")
        .timeout(std::time::Duration::from_secs(5))
        .assert()
        .failure()
        .stderr(predicate::str::contains("No available port"));
}

/// Test that invalid YAML in the settings file is rejected
#[test]
fn test_invalid_config_bad_yaml() {
    let config = create_temp_file(
        r#"
server:
  port: [not valid yaml
"#,
    );

    cmd()
        .arg("-c")
        .arg(config.path())
        .arg("--discover")
        .timeout(std::time::Duration::from_secs(5))
        .assert()
        .failure();
}

/// Test that invalid port (0) is rejected
#[test]
fn test_invalid_port_zero() {
    let config = create_temp_file(
        r#"
server:
  port: 0
"#,
    );

    cmd()
        .arg("-c")
        .arg(config.path())
        .arg("--discover")
        .timeout(std::time::Duration::from_secs(5))
        .assert()
        .failure();
}

/// Test that an invalid override URL is rejected
#[test]
fn test_invalid_override_url() {
    cmd()
        .args(["-c", "/nonexistent/config.yaml"])
        .args(["--hive-url", "hive1:10002"])
        .arg("--discover")
        .timeout(std::time::Duration::from_secs(5))
        .assert()
        .failure()
        .stderr(predicate::str::contains("targets.hive"));
}

/// Test that a metrics path without a leading slash is rejected
#[test]
fn test_invalid_metrics_path() {
    cmd()
        .args(["-c", "/nonexistent/config.yaml"])
        .args(["--metrics-path", "no-leading-slash"])
        .args(all_role_urls())
        .arg("--discover")
        .timeout(std::time::Duration::from_secs(5))
        .assert()
        .failure();
}

//! Prometheus Exposition Format output
//!
//! Flattens JMX beans into samples and formats them into the Prometheus text
//! exposition format (version 0.0.4).
//!
//! # Format Specification
//!
//! ```text
//! # TYPE <metric_name> <type>
//! <metric_name>{<label1>="<value1>",<label2>="<value2>"} <value>
//! ```
//!
//! A bean attribute becomes `hadoop_<role>_<attribute>` with `cluster`,
//! `instance` and `name` (the bean's object name) labels. Only number and
//! boolean attributes are exported.

use std::collections::{BTreeMap, HashMap};

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::collector::MetricsPayload;
use crate::discovery::Target;

/// Characters not allowed in metric names
static INVALID_NAME_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-zA-Z0-9_]+").expect("valid regex"));

/// Metric type for a sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MetricType {
    /// Gauge metric - a value that can go up and down
    Gauge,
    /// Untyped metric - type is not specified
    #[default]
    Untyped,
}

impl MetricType {
    /// Returns the Prometheus type string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricType::Gauge => "gauge",
            MetricType::Untyped => "untyped",
        }
    }
}

/// A single Prometheus sample
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// Metric name
    pub name: String,
    /// Metric type
    pub metric_type: MetricType,
    /// Help text
    pub help: Option<String>,
    /// Labels, kept sorted for deterministic output
    pub labels: BTreeMap<String, String>,
    /// Metric value
    pub value: f64,
}

impl Sample {
    /// Create a new untyped sample
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            metric_type: MetricType::Untyped,
            help: None,
            labels: BTreeMap::new(),
            value,
        }
    }

    /// Set the metric type
    pub fn with_type(mut self, metric_type: MetricType) -> Self {
        self.metric_type = metric_type;
        self
    }

    /// Set the help text
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Add a label
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }
}

/// Lower-case `raw` and replace runs of invalid characters with `_`
pub fn sanitize_name(raw: &str) -> String {
    INVALID_NAME_CHARS
        .replace_all(raw, "_")
        .trim_matches('_')
        .to_lowercase()
}

/// Flatten every numeric or boolean bean attribute of `payload`
pub fn samples_from_payload(
    target: &Target,
    cluster: Option<&str>,
    payload: &MetricsPayload,
) -> Vec<Sample> {
    let prefix = format!("hadoop_{}", target.role.name());
    let instance = target.endpoint.instance();
    let mut samples = Vec::new();

    for bean in payload.beans() {
        let Some(attributes) = bean.as_object() else {
            continue;
        };
        let bean_name = attributes
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default();

        for (attribute, value) in attributes {
            let value = match value {
                Value::Number(n) => match n.as_f64() {
                    Some(v) => v,
                    None => continue,
                },
                Value::Bool(b) => {
                    if *b {
                        1.0
                    } else {
                        0.0
                    }
                }
                _ => continue,
            };

            let attribute = sanitize_name(attribute);
            if attribute.is_empty() {
                continue;
            }

            let mut sample = Sample::new(format!("{}_{}", prefix, attribute), value)
                .with_label("instance", instance.as_str())
                .with_label("name", bean_name);
            if let Some(cluster) = cluster {
                sample = sample.with_label("cluster", cluster);
            }
            samples.push(sample);
        }
    }

    samples
}

/// `hadoop_exporter_target_up{role,instance}` for one scrape of `target`
pub fn target_up(target: &Target, up: bool) -> Sample {
    Sample::new("hadoop_exporter_target_up", if up { 1.0 } else { 0.0 })
        .with_type(MetricType::Gauge)
        .with_help("Whether the last fetch of the JMX endpoint returned metrics")
        .with_label("role", target.role.name())
        .with_label("instance", target.endpoint.instance())
}

/// Prometheus exposition format formatter
#[derive(Debug, Clone, Default)]
pub struct TextFormatter;

impl TextFormatter {
    /// Create a new formatter
    pub fn new() -> Self {
        Self
    }

    /// Format samples into Prometheus text format
    ///
    /// - HELP and TYPE lines are emitted once per unique metric name
    /// - Samples with the same name are grouped, in order of first occurrence
    pub fn format(&self, samples: &[Sample]) -> String {
        if samples.is_empty() {
            return String::new();
        }

        let mut output = String::with_capacity(samples.len() * 100);

        for (name, group) in Self::group_by_name(samples) {
            if let Some(help) = group.iter().find_map(|s| s.help.as_deref()) {
                output.push_str(&format!("# HELP {} {}\n", name, Self::escape_help(help)));
            }
            output.push_str(&format!(
                "# TYPE {} {}\n",
                name,
                group[0].metric_type.as_str()
            ));

            for sample in group {
                output.push_str(&Self::format_line(sample));
                output.push('\n');
            }
        }

        output
    }

    /// Group samples by name, preserving order of first occurrence
    fn group_by_name(samples: &[Sample]) -> Vec<(String, Vec<&Sample>)> {
        let mut groups: HashMap<&str, Vec<&Sample>> = HashMap::new();
        let mut order: Vec<&str> = Vec::new();

        for sample in samples {
            if !groups.contains_key(sample.name.as_str()) {
                order.push(&sample.name);
            }
            groups.entry(&sample.name).or_default().push(sample);
        }

        order
            .into_iter()
            .filter_map(|name| groups.remove(name).map(|g| (name.to_string(), g)))
            .collect()
    }

    fn format_line(sample: &Sample) -> String {
        let mut line = sample.name.clone();

        if !sample.labels.is_empty() {
            let pairs: Vec<String> = sample
                .labels
                .iter()
                .map(|(k, v)| format!("{}=\"{}\"", k, Self::escape_label_value(v)))
                .collect();
            line.push('{');
            line.push_str(&pairs.join(","));
            line.push('}');
        }

        line.push(' ');
        line.push_str(&Self::format_value(sample.value));
        line
    }

    /// Format a numeric value for Prometheus
    ///
    /// - NaN → "NaN"
    /// - +Inf → "+Inf"
    /// - -Inf → "-Inf"
    /// - Integers are formatted without decimal point
    fn format_value(value: f64) -> String {
        if value.is_nan() {
            "NaN".to_string()
        } else if value.is_infinite() {
            if value.is_sign_positive() {
                "+Inf".to_string()
            } else {
                "-Inf".to_string()
            }
        } else if value.fract() == 0.0 && value.abs() < 1e15 {
            format!("{}", value as i64)
        } else {
            format!("{}", value)
        }
    }

    /// Escape help text
    fn escape_help(help: &str) -> String {
        help.replace('\\', "\\\\").replace('\n', "\\n")
    }

    /// Escape label value
    ///
    /// Escapes backslash, double-quote, and newline characters.
    fn escape_label_value(value: &str) -> String {
        let mut escaped = String::with_capacity(value.len());
        for c in value.chars() {
            match c {
                '\\' => escaped.push_str("\\\\"),
                '"' => escaped.push_str("\\\""),
                '\n' => escaped.push_str("\\n"),
                _ => escaped.push(c),
            }
        }
        escaped
    }
}

//! HTTP 수집 모듈
//!
//! Management API 조회와 `/jmx` 메트릭 수집에 공통으로 쓰이는 HTTP 계층입니다.
//!
//! # Example
//!
//! ```ignore
//! use hadoop_jmx_exporter::collector::{HttpClient, MetricsFetcher};
//!
//! let client = HttpClient::new(5000)?.with_auth("admin", "admin");
//! let fetcher = MetricsFetcher::new(client);
//! let payload = fetcher.fetch("http://nn1:50070/jmx").await?;
//! ```

mod client;
mod fetcher;

pub use client::{HttpClient, DEFAULT_TIMEOUT_MS};
pub use fetcher::{MetricsFetcher, MetricsPayload};

//! Error types for hadoop-jmx-exporter
//!
//! This module defines the error types used throughout the application.
//! Discovery and fetch failures are non-fatal: operations log them and hand
//! them back as `Err`, so callers can tell "nothing found" (`Ok` with an empty
//! value) apart from "could not ask".

use thiserror::Error;

/// HTTP fetch 에러 타입
#[derive(Error, Debug)]
pub enum FetchError {
    /// HTTP 클라이언트 초기화 실패
    #[error("Failed to initialize HTTP client: {0}")]
    HttpClientInit(#[source] reqwest::Error),

    /// HTTP 요청 실패
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[source] reqwest::Error),

    /// HTTP 응답 읽기 실패
    #[error("Failed to read HTTP response: {0}")]
    HttpResponse(#[source] reqwest::Error),

    /// HTTP 상태 코드 에러
    #[error("HTTP error status: {0}")]
    HttpStatus(u16),

    /// JSON 파싱 에러
    #[error("JSON parse error: {0}")]
    JsonParse(String),

    /// 타임아웃
    /// The value is the configured timeout in milliseconds, if known.
    #[error("Request timed out{}", .0.map(|ms| format!(" after {}ms", ms)).unwrap_or_default())]
    Timeout(Option<u64>),

    /// 연결 실패
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
}

impl FetchError {
    /// HTTP 상태 코드 추출
    pub fn http_status(&self) -> Option<u16> {
        match self {
            FetchError::HttpStatus(code) => Some(*code),
            _ => None,
        }
    }

    /// Create a Timeout error with known duration
    pub fn timeout_with_duration(ms: u64) -> Self {
        FetchError::Timeout(Some(ms))
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout(None)
        } else if err.is_connect() {
            FetchError::ConnectionFailed(err.to_string())
        } else if err.is_request() {
            FetchError::HttpRequest(err)
        } else {
            FetchError::HttpResponse(err)
        }
    }
}

/// Errors raised while resolving clusters, hosts and active roles
#[derive(Error, Debug)]
pub enum DiscoveryError {
    /// A management-API or status call did not produce a usable response
    #[error("Request to {url} failed: {source}")]
    Fetch {
        url: String,
        #[source]
        source: FetchError,
    },

    /// The requested cluster is not listed by the management API
    #[error("Cluster '{cluster}' is not known to the management API (known: {known:?})")]
    UnknownCluster { cluster: String, known: Vec<String> },
}

impl DiscoveryError {
    pub(crate) fn fetch(url: &str, source: FetchError) -> Self {
        DiscoveryError::Fetch {
            url: url.to_string(),
            source,
        }
    }
}

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Discovery error that cannot be degraded to an empty result
    #[error("Discovery error: {0}")]
    Discovery(#[from] DiscoveryError),

    /// HTTP client error
    #[error("HTTP client error: {0}")]
    Fetch(#[from] FetchError),

    /// Listener or socket error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

//! Management API와 JMX 엔드포인트용 HTTP 클라이언트
//!
//! Connection pooling, 타임아웃, Basic Auth를 지원하는 비동기 JSON GET 클라이언트입니다.

use reqwest::{Client, ClientBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::error::FetchError;

/// 기본 타임아웃 (밀리초)
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// JSON GET 클라이언트
///
/// Every request carries the configured basic-auth credentials and is bounded
/// by a single timeout. Nothing is retried.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    timeout_ms: u64,
    auth: Option<(String, String)>,
}

impl HttpClient {
    /// 새 클라이언트 생성
    ///
    /// # Arguments
    /// * `timeout_ms` - 요청 타임아웃 (밀리초)
    pub fn new(timeout_ms: u64) -> Result<Self, FetchError> {
        let client = ClientBuilder::new()
            .timeout(Duration::from_millis(timeout_ms))
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(30))
            .build()
            .map_err(FetchError::HttpClientInit)?;

        Ok(Self::from_client(client, timeout_ms))
    }

    /// 미리 구성된 reqwest 클라이언트로 생성
    ///
    /// The caller is responsible for configuring the timeout on `client`;
    /// `timeout_ms` is only used to report timeouts.
    pub fn from_client(client: Client, timeout_ms: u64) -> Self {
        Self {
            client,
            timeout_ms,
            auth: None,
        }
    }

    /// Basic Auth 설정
    pub fn with_auth(mut self, username: &str, password: &str) -> Self {
        self.auth = Some((username.to_string(), password.to_string()));
        self
    }

    /// 설정된 타임아웃 (밀리초)
    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    /// GET 요청 후 JSON 본문을 `T`로 디코딩
    #[instrument(skip(self), fields(url = %url))]
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        debug!("Sending GET request");

        let mut req = self.client.get(url);

        if let Some((username, password)) = &self.auth {
            req = req.basic_auth(username, Some(password));
        }

        let response = req.send().await.map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus(status.as_u16()));
        }

        let body = response.text().await.map_err(|e| self.classify(e))?;

        serde_json::from_str(&body).map_err(|e| FetchError::JsonParse(e.to_string()))
    }

    fn classify(&self, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::timeout_with_duration(self.timeout_ms)
        } else {
            err.into()
        }
    }
}

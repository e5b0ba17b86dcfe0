//! JMX 메트릭 수집
//!
//! `/jmx` 엔드포인트를 GET 하고 `beans` 키가 있는 JSON 객체만 메트릭으로 인정합니다.

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, error, instrument};

use super::client::HttpClient;
use crate::error::FetchError;

/// 파싱된 JMX 응답
///
/// The object is kept exactly as the endpoint returned it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MetricsPayload(Map<String, Value>);

impl MetricsPayload {
    /// `beans` 키가 있는 JSON 값만 payload로 변환
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) if map.contains_key("beans") => Some(Self(map)),
            _ => None,
        }
    }

    /// bean 목록 (배열이 아니면 빈 slice)
    pub fn beans(&self) -> &[Value] {
        self.0
            .get("beans")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// 원본 JSON 객체 참조
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// 원본 JSON 값으로 변환
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

/// JMX 엔드포인트 fetcher
#[derive(Clone)]
pub struct MetricsFetcher {
    client: HttpClient,
}

impl MetricsFetcher {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    /// 단일 JMX URL 수집
    ///
    /// Returns `Ok(None)` when the endpoint answered but carried no `beans`,
    /// and `Err` on transport, status or JSON failures. Both are logged.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn fetch(&self, url: &str) -> Result<Option<MetricsPayload>, FetchError> {
        let body: Value = match self.client.get_json(url).await {
            Ok(body) => body,
            Err(e) => {
                match e.http_status() {
                    Some(status) => error!(url = %url, status, "Get {} failed", url),
                    None => error!(url = %url, error = %e, "Get {} failed", url),
                }
                return Err(e);
            }
        };

        debug!(body = %body, "JMX response received");

        match MetricsPayload::from_value(body) {
            Some(payload) => Ok(Some(payload)),
            None => {
                error!(url = %url, "No metrics get in the {}", url);
                Ok(None)
            }
        }
    }
}

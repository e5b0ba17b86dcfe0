//! MetricsFetcher 통합 테스트
//!
//! wiremock을 사용한 `/jmx` 엔드포인트 모킹 테스트

use std::time::Duration;

use hadoop_jmx_exporter::collector::{HttpClient, MetricsFetcher};
use hadoop_jmx_exporter::error::FetchError;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fetcher(timeout_ms: u64) -> MetricsFetcher {
    MetricsFetcher::new(
        HttpClient::new(timeout_ms)
            .unwrap()
            .with_auth("admin", "admin"),
    )
}

#[tokio::test]
async fn test_beans_payload_returned_unmodified() {
    let mock_server = MockServer::start().await;
    let body = json!({
        "beans": [
            {
                "name": "Hadoop:service=NameNode,name=JvmMetrics",
                "modelerType": "JvmMetrics",
                "MemHeapUsedM": 312.5,
                "ThreadsRunnable": 12
            },
            {
                "name": "Hadoop:service=NameNode,name=FSNamesystem",
                "tag.HAState": "active",
                "CapacityTotal": 1099511627776_i64
            }
        ]
    });

    Mock::given(method("GET"))
        .and(path("/jmx"))
        .and(header("authorization", "Basic YWRtaW46YWRtaW4="))
        .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
        .mount(&mock_server)
        .await;

    let url = format!("{}/jmx", mock_server.uri());
    let payload = fetcher(5000).fetch(&url).await.unwrap().unwrap();

    assert_eq!(payload.beans().len(), 2);
    assert_eq!(payload.into_value(), body);
}

#[tokio::test]
async fn test_missing_beans_is_empty() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&mock_server)
        .await;

    let url = format!("{}/jmx", mock_server.uri());
    let result = fetcher(5000).fetch(&url).await;

    assert!(matches!(result, Ok(None)));
}

#[tokio::test]
async fn test_http_500_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let url = format!("{}/jmx", mock_server.uri());
    let err = fetcher(5000).fetch(&url).await.unwrap_err();

    assert_eq!(err.http_status(), Some(500));
}

#[tokio::test]
async fn test_timeout_handling() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"beans": []}))
                .set_delay(Duration::from_secs(10)),
        )
        .mount(&mock_server)
        .await;

    let url = format!("{}/jmx", mock_server.uri());
    let err = fetcher(100).fetch(&url).await.unwrap_err();

    assert!(matches!(err, FetchError::Timeout(Some(100))));
}

#[tokio::test]
async fn test_invalid_json() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let url = format!("{}/jmx", mock_server.uri());
    let err = fetcher(5000).fetch(&url).await.unwrap_err();

    assert!(matches!(err, FetchError::JsonParse(_)));
}

#[tokio::test]
async fn test_connection_refused() {
    // Bind then drop a listener so the port is very likely closed
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let url = format!("http://127.0.0.1:{}/jmx", port);
    let result = fetcher(1000).fetch(&url).await;

    assert!(result.is_err());
}

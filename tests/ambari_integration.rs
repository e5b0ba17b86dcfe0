//! Ambari discovery integration tests
//!
//! wiremock을 사용한 management API 모킹 테스트

use hadoop_jmx_exporter::ambari::{AmbariClient, ManagementEndpoint};
use hadoop_jmx_exporter::collector::HttpClient;
use hadoop_jmx_exporter::discovery::{JmxEndpoint, RolePorts, Resolver};
use hadoop_jmx_exporter::error::{DiscoveryError, FetchError};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn ambari(server: &MockServer) -> AmbariClient {
    let http = HttpClient::new(5000).unwrap().with_auth("admin", "admin");
    AmbariClient::new(http, ManagementEndpoint::new(&server.uri()))
}

fn resolver(server: &MockServer) -> Resolver {
    Resolver::new(ambari(server), RolePorts::default())
}

async fn mount_clusters(server: &MockServer, names: &[&str]) {
    let items: Vec<_> = names
        .iter()
        .map(|name| json!({"href": "x", "Clusters": {"cluster_name": name}}))
        .collect();

    Mock::given(method("GET"))
        .and(path("/api/v1/clusters"))
        .and(query_param("fields", "Clusters/cluster_name"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": items })))
        .mount(server)
        .await;
}

async fn mount_component_hosts(server: &MockServer, service: &str, component: &str, hosts: &[&str]) {
    let host_components: Vec<_> = hosts
        .iter()
        .map(|host| json!({"href": "x", "HostRoles": {"host_name": host, "component_name": component}}))
        .collect();

    Mock::given(method("GET"))
        .and(path(format!(
            "/api/v1/clusters/prod/services/{}/components/{}",
            service, component
        )))
        .and(query_param("fields", "host_components/HostRoles/host_name"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "host_components": host_components })),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_list_clusters_in_order() {
    let server = MockServer::start().await;
    mount_clusters(&server, &["prod", "dev"]).await;

    let clusters = ambari(&server).list_clusters().await.unwrap();
    assert_eq!(clusters, vec!["prod", "dev"]);
}

#[tokio::test]
async fn test_requests_carry_basic_auth() {
    let server = MockServer::start().await;

    // admin:admin
    Mock::given(method("GET"))
        .and(path("/api/v1/clusters"))
        .and(header("authorization", "Basic YWRtaW46YWRtaW4="))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"Clusters": {"cluster_name": "prod"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let clusters = ambari(&server).list_clusters().await.unwrap();
    assert_eq!(clusters, vec!["prod"]);
}

#[tokio::test]
async fn test_no_clusters_is_empty_not_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/clusters"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"href": "x", "items": []})))
        .mount(&server)
        .await;

    let client = ambari(&server);
    assert!(client.list_clusters().await.unwrap().is_empty());
    assert_eq!(client.pick_cluster(None).await.unwrap(), None);
}

#[tokio::test]
async fn test_cluster_listing_http_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/clusters"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let err = ambari(&server).list_clusters().await.unwrap_err();
    match err {
        DiscoveryError::Fetch { source, .. } => assert_eq!(source.http_status(), Some(403)),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_pick_cluster() {
    let server = MockServer::start().await;
    mount_clusters(&server, &["prod", "dev"]).await;
    let client = ambari(&server);

    assert_eq!(client.pick_cluster(None).await.unwrap().as_deref(), Some("prod"));
    assert_eq!(
        client.pick_cluster(Some("dev")).await.unwrap().as_deref(),
        Some("dev")
    );

    let err = client.pick_cluster(Some("staging")).await.unwrap_err();
    assert!(matches!(err, DiscoveryError::UnknownCluster { ref cluster, .. } if cluster == "staging"));
}

#[tokio::test]
async fn test_list_hosts_upper_cases_names() {
    let server = MockServer::start().await;
    mount_component_hosts(&server, "HDFS", "DATANODE", &["dn1", "dn2", "dn3"]).await;

    let hosts = ambari(&server)
        .list_hosts("prod", "hdfs", "datanode")
        .await
        .unwrap();
    assert_eq!(hosts, vec!["dn1", "dn2", "dn3"]);
}

#[tokio::test]
async fn test_list_hosts_without_host_components() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/clusters/prod/services/HDFS/components/JOURNALNODE"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "href": "x",
            "ServiceComponentInfo": {"component_name": "JOURNALNODE"}
        })))
        .mount(&server)
        .await;

    let hosts = ambari(&server)
        .list_hosts("prod", "HDFS", "journalnode")
        .await
        .unwrap();
    assert!(hosts.is_empty());
}

#[tokio::test]
async fn test_list_hosts_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let result = ambari(&server).list_hosts("prod", "HDFS", "DATANODE").await;
    assert!(matches!(
        result,
        Err(DiscoveryError::Fetch {
            source: FetchError::HttpStatus(500),
            ..
        })
    ));
}

#[tokio::test]
async fn test_active_namenode_for_first_cluster() {
    let server = MockServer::start().await;
    mount_clusters(&server, &["prod", "dev"]).await;

    Mock::given(method("GET"))
        .and(path("/api/v1/clusters/prod/host_components"))
        .and(query_param("HostRoles/component_name", "NAMENODE"))
        .and(query_param("metrics/dfs/FSNamesystem/HAState", "active"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"HostRoles": {"host_name": "nn1", "component_name": "NAMENODE"}}]
        })))
        .mount(&server)
        .await;

    let resolver = resolver(&server);
    let cluster = resolver.ambari().pick_cluster(None).await.unwrap().unwrap();
    assert_eq!(cluster, "prod");

    let namenode = resolver.active_namenode(&cluster).await.unwrap();
    assert_eq!(namenode, Some(JmxEndpoint::for_host("nn1", 50070)));
    assert_eq!(namenode.unwrap().as_str(), "http://nn1:50070/jmx");
}

#[tokio::test]
async fn test_active_hbase_master() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/clusters/prod/host_components"))
        .and(query_param("HostRoles/component_name", "HBASE_MASTER"))
        .and(query_param("metrics/hbase/master/IsActiveMaster", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                {"HostRoles": {"host_name": "hm2"}},
                {"HostRoles": {"host_name": "hm1"}}
            ]
        })))
        .mount(&server)
        .await;

    let master = resolver(&server).active_hbase_master("prod").await.unwrap();
    assert_eq!(master.unwrap().as_str(), "http://hm2:16010/jmx");
}

#[tokio::test]
async fn test_no_active_namenode_during_failover() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/clusters/prod/host_components"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
        .mount(&server)
        .await;

    let namenode = resolver(&server).active_namenode("prod").await.unwrap();
    assert!(namenode.is_none());
}

#[tokio::test]
async fn test_node_wrappers_use_well_known_ports() {
    let server = MockServer::start().await;
    mount_component_hosts(&server, "HDFS", "DATANODE", &["dn1", "dn2"]).await;
    mount_component_hosts(&server, "HDFS", "JOURNALNODE", &["jn1"]).await;
    mount_component_hosts(&server, "MAPREDUCE2", "HISTORYSERVER", &["hs1"]).await;

    let resolver = resolver(&server);

    let datanodes: Vec<String> = resolver
        .datanodes("prod")
        .await
        .unwrap()
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(datanodes, vec!["http://dn1:1022/jmx", "http://dn2:1022/jmx"]);

    let journalnodes = resolver.journalnodes("prod").await.unwrap();
    assert_eq!(journalnodes, vec![JmxEndpoint::for_host("jn1", 8480)]);

    let history = resolver.history_servers("prod").await.unwrap();
    assert_eq!(history, vec![JmxEndpoint::for_host("hs1", 19888)]);
}

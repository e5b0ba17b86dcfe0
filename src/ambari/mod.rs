//! Ambari management API client
//!
//! Read-only lookups used by discovery: cluster names, hosts per component,
//! and hosts whose metrics mark them as the active HA instance.
//!
//! Every lookup is one GET. Failures are logged at error level and returned as
//! [`DiscoveryError`]; an answer that lists nothing is `Ok` with an empty value.

pub mod model;
pub mod source;

use tracing::{debug, error, instrument};

use crate::collector::HttpClient;
use crate::error::DiscoveryError;
use model::{ClusterList, ComponentHosts, HostComponentList};

pub use source::{ClusterConnection, ManagementEndpoint, PortValue};

/// Ambari REST client bound to one management endpoint
#[derive(Clone)]
pub struct AmbariClient {
    http: HttpClient,
    endpoint: ManagementEndpoint,
}

impl AmbariClient {
    pub fn new(http: HttpClient, endpoint: ManagementEndpoint) -> Self {
        Self { http, endpoint }
    }

    pub fn endpoint(&self) -> &ManagementEndpoint {
        &self.endpoint
    }

    /// Shared HTTP client, also used for ResourceManager status probes
    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    /// Cluster names known to the management API, in listed order
    #[instrument(skip(self), fields(endpoint = %self.endpoint))]
    pub async fn list_clusters(&self) -> Result<Vec<String>, DiscoveryError> {
        let url = format!(
            "{}/api/v1/clusters?fields=Clusters/cluster_name",
            self.endpoint
        );

        let list: ClusterList = self.get(&url).await?;
        let clusters: Vec<String> = list
            .items
            .unwrap_or_default()
            .into_iter()
            .map(|item| item.clusters.cluster_name)
            .collect();

        if clusters.is_empty() {
            error!(url = %url, "No cluster listed in {}", url);
        } else {
            debug!(clusters = ?clusters, "Clusters listed");
        }

        Ok(clusters)
    }

    /// Pick the cluster to monitor
    ///
    /// A requested cluster must be listed; otherwise the first listed cluster
    /// is used. `Ok(None)` when the API lists no cluster at all.
    pub async fn pick_cluster(
        &self,
        requested: Option<&str>,
    ) -> Result<Option<String>, DiscoveryError> {
        let clusters = self.list_clusters().await?;

        match requested {
            Some(wanted) if clusters.iter().any(|c| c == wanted) => Ok(Some(wanted.to_string())),
            Some(wanted) => {
                error!(cluster = %wanted, known = ?clusters, "Requested cluster is not listed");
                Err(DiscoveryError::UnknownCluster {
                    cluster: wanted.to_string(),
                    known: clusters,
                })
            }
            None => Ok(clusters.into_iter().next()),
        }
    }

    /// Hosts running `component` of `service` in `cluster`
    ///
    /// Both names are case-insensitive and sent upper-cased.
    #[instrument(skip(self))]
    pub async fn list_hosts(
        &self,
        cluster: &str,
        service: &str,
        component: &str,
    ) -> Result<Vec<String>, DiscoveryError> {
        let url = format!(
            "{}/api/v1/clusters/{}/services/{}/components/{}?fields=host_components/HostRoles/host_name",
            self.endpoint,
            cluster,
            service.to_uppercase(),
            component.to_uppercase()
        );

        let hosts: ComponentHosts = self.get(&url).await?;
        let hosts: Vec<String> = hosts
            .host_components
            .unwrap_or_default()
            .into_iter()
            .map(|hc| hc.host_roles.host_name)
            .collect();

        if hosts.is_empty() {
            error!(url = %url, "No host_components listed in {}", url);
        }

        Ok(hosts)
    }

    /// First host of `component` whose metrics satisfy `filter`
    ///
    /// `filter` is an Ambari predicate such as
    /// `metrics/dfs/FSNamesystem/HAState=active`.
    #[instrument(skip(self))]
    pub async fn active_host(
        &self,
        cluster: &str,
        component: &str,
        filter: &str,
    ) -> Result<Option<String>, DiscoveryError> {
        let url = format!(
            "{}/api/v1/clusters/{}/host_components?HostRoles/component_name={}&{}",
            self.endpoint,
            cluster,
            component.to_uppercase(),
            filter
        );

        let list: HostComponentList = self.get(&url).await?;
        let host = list
            .items
            .unwrap_or_default()
            .into_iter()
            .next()
            .map(|hc| hc.host_roles.host_name);

        match &host {
            Some(host) => debug!(host = %host, "Active host found"),
            None => error!(url = %url, "No active {} listed in {}", component, url),
        }

        Ok(host)
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, DiscoveryError> {
        self.http.get_json(url).await.map_err(|e| {
            match e.http_status() {
                Some(status) => error!(url = %url, status, "Get {} failed", url),
                None => error!(url = %url, error = %e, "Get {} failed", url),
            }
            DiscoveryError::fetch(url, e)
        })
    }
}

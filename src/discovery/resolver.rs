//! Role resolution: from a cluster name to the JMX endpoints worth polling

use tracing::{debug, error, info, instrument};

use super::role::{build_urls, HaCheck, JmxEndpoint, Role, RolePorts};
use crate::ambari::model::ResourceManagerInfo;
use crate::ambari::AmbariClient;
use crate::error::DiscoveryError;

/// Resolves role families to JMX endpoints through the management API
#[derive(Clone)]
pub struct Resolver {
    ambari: AmbariClient,
    ports: RolePorts,
}

impl Resolver {
    pub fn new(ambari: AmbariClient, ports: RolePorts) -> Self {
        Self { ambari, ports }
    }

    pub fn ambari(&self) -> &AmbariClient {
        &self.ambari
    }

    /// Endpoints for `role` in `cluster`
    ///
    /// Singleton HA roles yield at most one endpoint. Roles that are not
    /// discoverable yield nothing.
    pub async fn resolve(
        &self,
        cluster: &str,
        role: Role,
    ) -> Result<Vec<JmxEndpoint>, DiscoveryError> {
        let (Some(spec), Some(port)) = (role.spec(), self.ports.port(role)) else {
            return Ok(Vec::new());
        };

        match spec.ha {
            HaCheck::None => {
                let hosts = self
                    .ambari
                    .list_hosts(cluster, spec.service, spec.component)
                    .await?;
                Ok(build_urls(&hosts, port))
            }
            HaCheck::AmbariFilter(filter) => {
                let host = self
                    .ambari
                    .active_host(cluster, spec.component, filter)
                    .await?;
                Ok(host
                    .map(|h| JmxEndpoint::for_host(&h, port))
                    .into_iter()
                    .collect())
            }
            HaCheck::ClusterInfo => Ok(self
                .probe_active(cluster, spec.service, spec.component, port)
                .await?
                .into_iter()
                .collect()),
        }
    }

    /// Active NameNode, port 50070 by default
    pub async fn active_namenode(
        &self,
        cluster: &str,
    ) -> Result<Option<JmxEndpoint>, DiscoveryError> {
        Ok(self.resolve(cluster, Role::NameNode).await?.into_iter().next())
    }

    /// Active HBase Master, port 16010 by default
    pub async fn active_hbase_master(
        &self,
        cluster: &str,
    ) -> Result<Option<JmxEndpoint>, DiscoveryError> {
        Ok(self
            .resolve(cluster, Role::HBaseMaster)
            .await?
            .into_iter()
            .next())
    }

    /// Active ResourceManager, port 8088 by default
    pub async fn active_resourcemanager(
        &self,
        cluster: &str,
    ) -> Result<Option<JmxEndpoint>, DiscoveryError> {
        Ok(self
            .resolve(cluster, Role::ResourceManager)
            .await?
            .into_iter()
            .next())
    }

    /// Every DataNode, port 1022 by default
    pub async fn datanodes(&self, cluster: &str) -> Result<Vec<JmxEndpoint>, DiscoveryError> {
        self.resolve(cluster, Role::DataNode).await
    }

    /// Every JournalNode, port 8480 by default
    pub async fn journalnodes(&self, cluster: &str) -> Result<Vec<JmxEndpoint>, DiscoveryError> {
        self.resolve(cluster, Role::JournalNode).await
    }

    /// Every MapReduce2 history server, port 19888 by default
    pub async fn history_servers(
        &self,
        cluster: &str,
    ) -> Result<Vec<JmxEndpoint>, DiscoveryError> {
        self.resolve(cluster, Role::HistoryServer).await
    }

    /// Walk the listed candidates in order and stop at the first one whose
    /// `/ws/v1/cluster/info` reports `haState == "ACTIVE"`.
    ///
    /// A candidate that fails or is not active is skipped. Only the host
    /// listing itself can fail the whole lookup.
    #[instrument(skip(self))]
    async fn probe_active(
        &self,
        cluster: &str,
        service: &str,
        component: &str,
        port: u16,
    ) -> Result<Option<JmxEndpoint>, DiscoveryError> {
        let hosts = self.ambari.list_hosts(cluster, service, component).await?;

        for host in &hosts {
            let url = format!("http://{}:{}/ws/v1/cluster/info", host, port);

            match self.ambari.http().get_json::<ResourceManagerInfo>(&url).await {
                Ok(info) if info.ha_state() == Some("ACTIVE") => {
                    info!(host = %host, "Active {} found", component);
                    return Ok(Some(JmxEndpoint::for_host(host, port)));
                }
                Ok(info) if info.cluster_info.is_none() => {
                    error!(url = %url, "No clusterInfo in {}", url);
                }
                Ok(info) => {
                    debug!(
                        host = %host,
                        ha_state = ?info.ha_state(),
                        "haState not ACTIVE, try another node"
                    );
                }
                Err(e) => {
                    error!(url = %url, error = %e, "Get {} failed, try another node", url);
                }
            }
        }

        error!(
            cluster = %cluster,
            candidates = hosts.len(),
            "Cannot get active {} url from /ws/v1/cluster/info",
            component.to_lowercase()
        );
        Ok(None)
    }
}

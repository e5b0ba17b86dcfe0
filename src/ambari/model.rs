//! Response shapes of the Ambari and ResourceManager REST APIs
//!
//! Only the fields discovery reads are modelled. Missing collections
//! deserialize to empty ones so that "nothing listed" is not a decode error.

use serde::Deserialize;

/// `GET /api/v1/clusters?fields=Clusters/cluster_name`
#[derive(Debug, Deserialize)]
pub struct ClusterList {
    #[serde(default)]
    pub items: Option<Vec<ClusterItem>>,
}

#[derive(Debug, Deserialize)]
pub struct ClusterItem {
    #[serde(rename = "Clusters")]
    pub clusters: ClusterInfo,
}

#[derive(Debug, Deserialize)]
pub struct ClusterInfo {
    pub cluster_name: String,
}

#[derive(Debug, Deserialize)]
pub struct HostRoles {
    pub host_name: String,
    #[serde(default)]
    pub component_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HostComponent {
    #[serde(rename = "HostRoles")]
    pub host_roles: HostRoles,
}

/// `GET /api/v1/clusters/{c}/services/{S}/components/{C}?fields=host_components/HostRoles/host_name`
#[derive(Debug, Deserialize)]
pub struct ComponentHosts {
    #[serde(default)]
    pub host_components: Option<Vec<HostComponent>>,
}

/// `GET /api/v1/clusters/{c}/host_components?HostRoles/component_name=...&<filter>`
#[derive(Debug, Deserialize)]
pub struct HostComponentList {
    #[serde(default)]
    pub items: Option<Vec<HostComponent>>,
}

/// `GET http://{rm}:8088/ws/v1/cluster/info`
#[derive(Debug, Deserialize)]
pub struct ResourceManagerInfo {
    #[serde(rename = "clusterInfo", default)]
    pub cluster_info: Option<ResourceManagerClusterInfo>,
}

#[derive(Debug, Deserialize)]
pub struct ResourceManagerClusterInfo {
    #[serde(rename = "haState", default)]
    pub ha_state: Option<String>,
}

impl ResourceManagerInfo {
    pub fn ha_state(&self) -> Option<&str> {
        self.cluster_info
            .as_ref()
            .and_then(|info| info.ha_state.as_deref())
    }
}

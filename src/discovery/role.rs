//! Role families and JMX endpoint assembly
//!
//! Each Hadoop role the exporter knows about is a variant of [`Role`]. The
//! table in [`Role::spec`] maps it to its Ambari service/component pair, its
//! well-known JMX port and the way its "active" instance is verified.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

/// Hadoop role family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    NameNode,
    ResourceManager,
    #[serde(rename = "hbase")]
    HBaseMaster,
    DataNode,
    JournalNode,
    #[serde(rename = "mapreduce2")]
    HistoryServer,
    /// Hive is never discovered; its URL comes from configuration only.
    Hive,
}

/// How the active instance of a role is identified
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HaCheck {
    /// Every listed host is a target
    None,
    /// Ambari filters `host_components` by this metric predicate
    AmbariFilter(&'static str),
    /// Each candidate's `/ws/v1/cluster/info` reports `haState`
    ClusterInfo,
}

/// Discovery facts for a role family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleSpec {
    /// Ambari service, e.g. `HDFS`
    pub service: &'static str,
    /// Ambari component, e.g. `NAMENODE`
    pub component: &'static str,
    /// Well-known JMX port
    pub port: u16,
    pub ha: HaCheck,
}

impl Role {
    /// Roles that can be located through the management API, in discovery order
    pub const DISCOVERABLE: [Role; 6] = [
        Role::NameNode,
        Role::ResourceManager,
        Role::HBaseMaster,
        Role::DataNode,
        Role::JournalNode,
        Role::HistoryServer,
    ];

    /// Every role, discoverable or not
    pub const ALL: [Role; 7] = [
        Role::NameNode,
        Role::ResourceManager,
        Role::HBaseMaster,
        Role::DataNode,
        Role::JournalNode,
        Role::HistoryServer,
        Role::Hive,
    ];

    /// Short name used in configuration keys, labels and metric prefixes
    pub fn name(self) -> &'static str {
        match self {
            Role::NameNode => "namenode",
            Role::ResourceManager => "resourcemanager",
            Role::HBaseMaster => "hbase",
            Role::DataNode => "datanode",
            Role::JournalNode => "journalnode",
            Role::HistoryServer => "mapreduce2",
            Role::Hive => "hive",
        }
    }

    /// Discovery table; `None` for roles that are configured only
    pub fn spec(self) -> Option<RoleSpec> {
        let spec = match self {
            Role::NameNode => RoleSpec {
                service: "HDFS",
                component: "NAMENODE",
                port: 50070,
                ha: HaCheck::AmbariFilter("metrics/dfs/FSNamesystem/HAState=active"),
            },
            Role::HBaseMaster => RoleSpec {
                service: "HBASE",
                component: "HBASE_MASTER",
                port: 16010,
                ha: HaCheck::AmbariFilter("metrics/hbase/master/IsActiveMaster=true"),
            },
            Role::ResourceManager => RoleSpec {
                service: "YARN",
                component: "RESOURCEMANAGER",
                port: 8088,
                ha: HaCheck::ClusterInfo,
            },
            Role::DataNode => RoleSpec {
                service: "HDFS",
                component: "DATANODE",
                port: 1022,
                ha: HaCheck::None,
            },
            Role::JournalNode => RoleSpec {
                service: "HDFS",
                component: "JOURNALNODE",
                port: 8480,
                ha: HaCheck::None,
            },
            Role::HistoryServer => RoleSpec {
                service: "MAPREDUCE2",
                component: "HISTORYSERVER",
                port: 19888,
                ha: HaCheck::None,
            },
            Role::Hive => return None,
        };
        Some(spec)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-role JMX ports, defaulting to the well-known ones
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RolePorts(BTreeMap<Role, u16>);

impl RolePorts {
    /// Override the port for `role`
    pub fn with_port(mut self, role: Role, port: u16) -> Self {
        self.0.insert(role, port);
        self
    }

    /// Port for `role`, `None` for roles without a well-known port
    pub fn port(&self, role: Role) -> Option<u16> {
        self.0
            .get(&role)
            .copied()
            .or_else(|| role.spec().map(|s| s.port))
    }

    pub(crate) fn overrides(&self) -> impl Iterator<Item = (Role, u16)> + '_ {
        self.0.iter().map(|(role, port)| (*role, *port))
    }
}

/// Fully qualified JMX URL, e.g. `http://nn1:50070/jmx`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct JmxEndpoint(String);

impl JmxEndpoint {
    /// `http://<host>:<port>/jmx`
    pub fn for_host(host: &str, port: u16) -> Self {
        Self(format!("http://{}:{}/jmx", host, port))
    }

    /// Accept a user-supplied URL; only absolute http(s) URLs with a host are valid
    pub fn parse(raw: &str) -> Result<Self, String> {
        let url = Url::parse(raw).map_err(|e| format!("invalid URL '{}': {}", raw, e))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(format!("URL '{}' must use http or https", raw));
        }
        if url.host_str().is_none() {
            return Err(format!("URL '{}' has no host", raw));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `host:port` part of the URL, used as the `instance` label
    pub fn instance(&self) -> String {
        match Url::parse(&self.0) {
            Ok(url) => match (url.host_str(), url.port_or_known_default()) {
                (Some(host), Some(port)) => format!("{}:{}", host, port),
                (Some(host), None) => host.to_string(),
                _ => self.0.clone(),
            },
            Err(_) => self.0.clone(),
        }
    }
}

impl fmt::Display for JmxEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One JMX URL per host, in host order
pub fn build_urls<S: AsRef<str>>(hosts: &[S], port: u16) -> Vec<JmxEndpoint> {
    hosts
        .iter()
        .map(|host| JmxEndpoint::for_host(host.as_ref(), port))
        .collect()
}

//! Endpoint discovery
//!
//! Runs the chain connection file → cluster → role hosts → JMX URLs once for
//! every role family and merges the result with configured overrides.
//!
//! # Example
//!
//! ```ignore
//! use hadoop_jmx_exporter::{collector::HttpClient, config::Config, discovery};
//!
//! let config = Config::load_or_default("config.yaml")?;
//! let http = HttpClient::new(config.ambari.timeout_ms)?;
//! let targets = discovery::discover_targets(&config, &http).await?;
//! ```

mod resolver;
mod role;

use serde::Serialize;
use tracing::{info, warn};

use crate::ambari::{AmbariClient, ClusterConnection};
use crate::collector::HttpClient;
use crate::config::Config;
use crate::error::{AppResult, DiscoveryError};

pub use resolver::Resolver;
pub use role::{build_urls, HaCheck, JmxEndpoint, Role, RolePorts, RoleSpec};

/// Where a target's URL came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetSource {
    Discovered,
    Configured,
}

/// One JMX endpoint to poll
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Target {
    pub role: Role,
    pub endpoint: JmxEndpoint,
    pub source: TargetSource,
}

/// Everything the exporter polls on a scrape
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TargetSet {
    /// Cluster the discovered targets belong to
    pub cluster: Option<String>,
    pub targets: Vec<Target>,
}

impl TargetSet {
    /// Targets of `role`, in discovery order
    pub fn role(&self, role: Role) -> impl Iterator<Item = &Target> + '_ {
        self.targets.iter().filter(move |t| t.role == role)
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    fn push_all(&mut self, role: Role, endpoints: Vec<JmxEndpoint>, source: TargetSource) {
        self.targets
            .extend(endpoints.into_iter().map(|endpoint| Target {
                role,
                endpoint,
                source,
            }));
    }

    /// Human readable listing, one target per line
    pub fn to_text(&self) -> String {
        let mut out = format!(
            "cluster: {}\n",
            self.cluster.as_deref().unwrap_or("<none>")
        );
        for role in Role::ALL {
            let urls: Vec<&str> = self.role(role).map(|t| t.endpoint.as_str()).collect();
            if urls.is_empty() {
                out.push_str(&format!("{:<16} -\n", role.name()));
            } else {
                out.push_str(&format!("{:<16} {}\n", role.name(), urls.join(", ")));
            }
        }
        out
    }
}

/// Build the target set for `config`
///
/// Configured overrides replace discovery per role. When every discoverable
/// role is overridden the management API is not contacted at all.
///
/// # Errors
/// Fails only for configuration problems (unreadable or unusable connection
/// file, invalid override URL) and for a requested cluster that is not
/// listed. Any other discovery failure leaves the affected role empty.
pub async fn discover_targets(config: &Config, http: &HttpClient) -> AppResult<TargetSet> {
    let mut set = TargetSet {
        cluster: config.cluster.clone(),
        targets: Vec::new(),
    };

    let resolver = if config.targets.covers_all_discoverable() {
        info!("All roles configured explicitly, skipping discovery");
        None
    } else {
        let connection = ClusterConnection::load(&config.ambari.connection_file)?;
        let endpoint = connection.resolve()?;
        info!(endpoint = %endpoint, "Management API resolved");
        Some(Resolver::new(
            AmbariClient::new(http.clone(), endpoint),
            config.ports.clone(),
        ))
    };

    let cluster = match &resolver {
        Some(resolver) => match resolver.ambari().pick_cluster(config.cluster.as_deref()).await {
            Ok(cluster) => cluster,
            Err(e @ DiscoveryError::UnknownCluster { .. }) => return Err(e.into()),
            Err(_) => None,
        },
        None => None,
    };
    if cluster.is_some() {
        set.cluster = cluster.clone();
    }

    for role in Role::ALL {
        let configured = config.targets.endpoints(role)?;
        if !configured.is_empty() {
            set.push_all(role, configured, TargetSource::Configured);
            continue;
        }

        let (Some(resolver), Some(cluster)) = (&resolver, &cluster) else {
            continue;
        };
        if role.spec().is_none() {
            continue;
        }

        let discovered = resolver.resolve(cluster, role).await.unwrap_or_default();
        if discovered.is_empty() {
            warn!(role = %role, cluster = %cluster, "No endpoint discovered");
        }
        set.push_all(role, discovered, TargetSource::Discovered);
    }

    info!(
        cluster = ?set.cluster,
        targets = set.targets.len(),
        "Target discovery complete"
    );

    Ok(set)
}

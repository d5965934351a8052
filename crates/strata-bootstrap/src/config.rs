//! Bootstrap configuration, loaded from the environment.

use strata_cluster::{ClusterConfig, DEFAULT_POOL_SIZE};
use strata_types::{ConsistencyLevel, KeyspaceName, ReplicationFactor};
use tracing::warn;

use crate::error::{BootstrapError, BootstrapResult};

/// Environment variable names read by [`BootstrapConfig::from_env`].
pub const ENV_HOST: &str = "STRATA_HOST";
pub const ENV_CLUSTER_NAME: &str = "STRATA_CLUSTER_NAME";
pub const ENV_KEYSPACE: &str = "STRATA_KEYSPACE";
pub const ENV_USERNAME: &str = "STRATA_USERNAME";
pub const ENV_PASSWORD: &str = "STRATA_PASSWORD";
pub const ENV_REPLICATION_FACTOR: &str = "STRATA_REPLICATION_FACTOR";
pub const ENV_POOL_SIZE: &str = "STRATA_POOL_SIZE";
pub const ENV_METRICS: &str = "STRATA_METRICS";

/// Configuration for one bootstrap run.
#[derive(Debug, Clone)]
pub struct BootstrapConfig {
    /// Cluster contact point, `host:port`.
    pub host: String,
    /// Name of the cluster to connect to.
    pub cluster_name: String,
    /// The keyspace to reconcile.
    pub keyspace: KeyspaceName,
    /// Optional authentication username; credentials are presented only
    /// when non-empty.
    pub username: Option<String>,
    /// Password paired with `username`.
    pub password: Option<String>,
    /// Replication factor applied if the keyspace has to be created.
    pub replication_factor: ReplicationFactor,
    /// Cap on pooled connections.
    pub pool_size: usize,
    /// Read consistency for the handle and its downstream consumers.
    pub read_consistency: ConsistencyLevel,
    /// Attach Prometheus instrumentation to the cluster handle.
    pub metrics: bool,
}

impl BootstrapConfig {
    /// Creates a configuration with defaults for everything optional.
    pub fn new(
        host: impl Into<String>,
        cluster_name: impl Into<String>,
        keyspace: KeyspaceName,
    ) -> Self {
        Self {
            host: host.into(),
            cluster_name: cluster_name.into(),
            keyspace,
            username: None,
            password: None,
            replication_factor: ReplicationFactor::DEFAULT,
            pool_size: DEFAULT_POOL_SIZE,
            read_consistency: ConsistencyLevel::One,
            metrics: false,
        }
    }

    /// Loads the configuration from `STRATA_*` environment variables.
    pub fn from_env() -> BootstrapResult<Self> {
        Self::from_source(|name| std::env::var(name).ok())
    }

    /// Loads the configuration from an arbitrary variable source.
    ///
    /// `source` returns the value for a variable name, or `None` when it is
    /// unset. Split out from [`Self::from_env`] so parsing is testable
    /// without mutating process state.
    pub fn from_source(source: impl Fn(&str) -> Option<String>) -> BootstrapResult<Self> {
        let host = require(&source, ENV_HOST)?;
        let cluster_name = require(&source, ENV_CLUSTER_NAME)?;
        let keyspace = KeyspaceName::new(require(&source, ENV_KEYSPACE)?)
            .map_err(|e| BootstrapError::config(format!("{ENV_KEYSPACE}: {e}")))?;

        let username = source(ENV_USERNAME);
        let password = source(ENV_PASSWORD);

        let replication_factor = match source(ENV_REPLICATION_FACTOR) {
            Some(raw) => {
                let (factor, fell_back) = ReplicationFactor::parse_lossy(&raw);
                if fell_back {
                    warn!(
                        input = %raw,
                        "{ENV_REPLICATION_FACTOR} should contain a positive integer, defaulting to 1"
                    );
                }
                factor
            }
            None => ReplicationFactor::DEFAULT,
        };

        let pool_size = match source(ENV_POOL_SIZE) {
            Some(raw) => raw.trim().parse::<usize>().map_err(|_| {
                BootstrapError::config(format!("{ENV_POOL_SIZE}: `{raw}` is not a valid pool size"))
            })?,
            None => DEFAULT_POOL_SIZE,
        };

        let metrics = source(ENV_METRICS)
            .map(|raw| matches!(raw.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            host,
            cluster_name,
            keyspace,
            username,
            password,
            replication_factor,
            pool_size,
            read_consistency: ConsistencyLevel::One,
            metrics,
        })
    }

    /// The cluster-connection configuration derived from this bootstrap
    /// configuration.
    pub fn cluster_config(&self) -> ClusterConfig {
        let mut config = ClusterConfig::new(self.host.clone(), self.cluster_name.clone())
            .with_pool_size(self.pool_size)
            .with_read_consistency(self.read_consistency)
            .with_metrics(self.metrics);
        if let Some(username) = &self.username {
            config =
                config.with_credentials(username.clone(), self.password.clone().unwrap_or_default());
        }
        config
    }
}

fn require(source: &impl Fn(&str) -> Option<String>, name: &str) -> BootstrapResult<String> {
    match source(name) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(BootstrapError::config(format!("{name} is not set"))),
    }
}

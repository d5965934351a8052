//! Cluster connection configuration.

use std::time::Duration;

use strata_types::ConsistencyLevel;
use strata_wire::Credentials;

/// Default cap on pooled connections.
pub const DEFAULT_POOL_SIZE: usize = 100;

/// Configuration for a cluster connection.
#[derive(Debug, Clone)]
pub struct ClusterConfig {
    /// Cluster contact point, `host:port`.
    pub host: String,
    /// Name of the cluster this handle expects to reach.
    pub cluster_name: String,
    /// Optional authentication username. Credentials are only presented
    /// when the username is non-empty.
    pub username: Option<String>,
    /// Password paired with `username`.
    pub password: Option<String>,
    /// Cap on pooled connections.
    pub pool_size: usize,
    /// Read consistency applied to reads issued through this handle and
    /// inherited by downstream consumers sharing it.
    pub read_consistency: ConsistencyLevel,
    /// Timeout for establishing a TCP connection.
    pub connect_timeout: Duration,
    /// Read timeout per operation.
    pub read_timeout: Option<Duration>,
    /// Write timeout per operation.
    pub write_timeout: Option<Duration>,
    /// Attach Prometheus instrumentation to the handle at construction.
    pub metrics: bool,
}

impl ClusterConfig {
    /// Creates a configuration for the given contact point and cluster name.
    pub fn new(host: impl Into<String>, cluster_name: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            cluster_name: cluster_name.into(),
            username: None,
            password: None,
            pool_size: DEFAULT_POOL_SIZE,
            read_consistency: ConsistencyLevel::One,
            connect_timeout: Duration::from_secs(10),
            read_timeout: Some(Duration::from_secs(30)),
            write_timeout: Some(Duration::from_secs(30)),
            metrics: false,
        }
    }

    /// Sets the authentication credentials.
    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Sets the pooled connection cap.
    pub fn with_pool_size(mut self, pool_size: usize) -> Self {
        self.pool_size = pool_size;
        self
    }

    /// Overrides the default single-replica read consistency.
    pub fn with_read_consistency(mut self, level: ConsistencyLevel) -> Self {
        self.read_consistency = level;
        self
    }

    /// Sets the TCP connect timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Enables Prometheus instrumentation.
    pub fn with_metrics(mut self, metrics: bool) -> Self {
        self.metrics = metrics;
        self
    }

    /// The credentials to present during the handshake, or `None` when no
    /// username is configured or the configured username is empty.
    pub fn credentials(&self) -> Option<Credentials> {
        match self.username.as_deref() {
            Some(username) if !username.is_empty() => Some(Credentials {
                username: username.to_string(),
                password: self.password.clone().unwrap_or_default(),
            }),
            _ => None,
        }
    }
}

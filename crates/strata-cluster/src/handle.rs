//! The shared cluster handle.

use std::sync::Arc;

use strata_types::{ColumnFamilyDescriptor, KeyspaceDescriptor, KeyspaceMetadata, KeyspaceName};
use tracing::{debug, info};

use crate::config::ClusterConfig;
use crate::connection::AdminConnection;
use crate::error::ClusterResult;
use crate::metrics;
use crate::ops::SchemaOps;
use crate::pool::ConnectionPool;

/// A cheaply-cloneable handle to a `Strata` cluster.
///
/// Created once at process startup and released once at shutdown; clones
/// share the same connection pool. Each operation borrows a pooled
/// connection for the duration of the call and returns it before the call
/// completes, so the pool is never held across a reconciliation pass.
#[derive(Clone)]
pub struct ClusterHandle {
    inner: Arc<HandleInner>,
}

struct HandleInner {
    config: ClusterConfig,
    pool: ConnectionPool,
}

impl ClusterHandle {
    /// Connects to the cluster described by `config`.
    ///
    /// Dials one connection eagerly so an unreachable cluster or rejected
    /// credentials fail here rather than on the first schema operation.
    pub fn connect(config: ClusterConfig) -> ClusterResult<Self> {
        info!(host = %config.host, cluster = %config.cluster_name, "connecting to cluster");
        if config.metrics {
            // Force registry initialization up front; recording stays
            // gated on the flag.
            let _ = metrics::Metrics::global();
            debug!("cluster metrics instrumentation enabled");
        }

        let connection = AdminConnection::open(&config)?;
        if config.metrics {
            metrics::record_connection_opened();
        }

        let pool = ConnectionPool::new(config.pool_size);
        pool.seed(connection);

        Ok(Self {
            inner: Arc::new(HandleInner { config, pool }),
        })
    }

    /// The configuration this handle was built from.
    pub fn config(&self) -> &ClusterConfig {
        &self.inner.config
    }

    /// Releases all pooled connections and stops pool activity.
    ///
    /// Safe to call more than once; repeated calls are no-ops.
    pub fn shutdown(&self) {
        if self.inner.pool.close() {
            info!(cluster = %self.inner.config.cluster_name, "released cluster connection pool");
        }
    }

    /// Whether [`Self::shutdown`] has run.
    pub fn is_shut_down(&self) -> bool {
        self.inner.pool.is_closed()
    }

    /// Runs `f` with a borrowed connection, returning it to the pool on
    /// success and discarding it after a failure (the stream state is then
    /// unknown).
    fn with_connection<T>(
        &self,
        op: &'static str,
        f: impl FnOnce(&mut AdminConnection) -> ClusterResult<T>,
    ) -> ClusterResult<T> {
        let _timer = self.inner.config.metrics.then(|| metrics::OpTimer::new(op));

        let mut connection = self.inner.pool.checkout(&self.inner.config)?;
        let result = f(&mut connection);
        match &result {
            Ok(_) => self.inner.pool.checkin(connection),
            Err(_) => self.inner.pool.discard(connection),
        }

        if self.inner.config.metrics {
            metrics::record_op(op, result.is_ok());
        }
        result
    }
}

impl SchemaOps for ClusterHandle {
    fn describe_keyspace(&self, name: &KeyspaceName) -> ClusterResult<Option<KeyspaceMetadata>> {
        self.with_connection("describe_keyspace", |c| c.describe_keyspace(name))
    }

    fn add_keyspace(&self, descriptor: &KeyspaceDescriptor) -> ClusterResult<()> {
        self.with_connection("add_keyspace", |c| c.add_keyspace(descriptor))
    }

    fn add_column_family(
        &self,
        keyspace: &KeyspaceName,
        descriptor: &ColumnFamilyDescriptor,
    ) -> ClusterResult<()> {
        self.with_connection("add_column_family", |c| {
            c.add_column_family(keyspace, descriptor)
        })
    }
}

impl std::fmt::Debug for ClusterHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClusterHandle")
            .field("host", &self.inner.config.host)
            .field("cluster", &self.inner.config.cluster_name)
            .field("pool", &self.inner.pool)
            .finish()
    }
}

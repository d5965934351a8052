//! Bootstrap error types.
//!
//! Two fatal classes: connection failures and rejected schema changes.
//! Both abort startup — there is no partial-schema running mode. The only
//! recoverable condition (a malformed replication factor) is handled in
//! configuration parsing and never reaches these types.

use strata_cluster::ClusterError;
use strata_types::KeyspaceName;
use thiserror::Error;

/// Result type for bootstrap operations.
pub type BootstrapResult<T> = Result<T, BootstrapError>;

/// Errors that abort the schema bootstrap.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// The cluster is unreachable, the credentials were rejected, or a
    /// connection broke mid-operation.
    #[error("cluster connection failed: {0}")]
    Connection(#[source] ClusterError),

    /// The cluster rejected a schema change.
    #[error("schema change rejected for `{object}`: {source}")]
    Schema {
        object: String,
        #[source]
        source: ClusterError,
    },

    /// The keyspace vanished between reconciliation steps.
    #[error("keyspace `{0}` not found")]
    KeyspaceMissing(KeyspaceName),

    /// Invalid or missing configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl BootstrapError {
    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Classifies a cluster error raised while operating on `object`:
    /// server-side rejections are schema errors, everything else is a
    /// connection failure.
    pub(crate) fn for_object(object: impl Into<String>, source: ClusterError) -> Self {
        match source {
            ClusterError::Rejected { .. } => Self::Schema {
                object: object.into(),
                source,
            },
            other => Self::Connection(other),
        }
    }
}

//! Keyspace reconciliation.

use strata_cluster::SchemaOps;
use strata_types::{ConsistencyLevel, KeyspaceDescriptor, KeyspaceName, ReplicationFactor};
use tracing::{debug, info, warn};

use crate::error::{BootstrapError, BootstrapResult};

/// Handle to a reconciled keyspace.
///
/// Carries the read consistency the handle's consumers inherit; this is
/// what gets handed to the object-mapping layer once reconciliation
/// completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyspaceHandle {
    name: KeyspaceName,
    read_consistency: ConsistencyLevel,
}

impl KeyspaceHandle {
    pub(crate) fn new(name: KeyspaceName, read_consistency: ConsistencyLevel) -> Self {
        Self {
            name,
            read_consistency,
        }
    }

    pub fn name(&self) -> &KeyspaceName {
        &self.name
    }

    pub fn read_consistency(&self) -> ConsistencyLevel {
        self.read_consistency
    }
}

/// Ensures the keyspace exists, creating it with `replication_factor` when
/// absent.
///
/// An existing keyspace is returned as-is: a mismatched replication factor
/// is deliberately not reconciled. A rejected creation — including a name
/// collision from a concurrent bootstrap — is fatal.
pub fn ensure_keyspace<S: SchemaOps + ?Sized>(
    ops: &S,
    name: &KeyspaceName,
    replication_factor: ReplicationFactor,
    read_consistency: ConsistencyLevel,
) -> BootstrapResult<KeyspaceHandle> {
    let existing = ops
        .describe_keyspace(name)
        .map_err(|e| BootstrapError::for_object(name.as_str(), e))?;

    match existing {
        Some(_) => {
            debug!(keyspace = %name, "keyspace already exists");
        }
        None => {
            warn!(keyspace = %name, "keyspace does not exist, creating it");
            let descriptor = KeyspaceDescriptor::new(name.clone(), replication_factor);
            ops.add_keyspace(&descriptor)
                .map_err(|e| BootstrapError::for_object(name.as_str(), e))?;
            info!(
                keyspace = %name,
                replication_factor = %replication_factor,
                "created keyspace"
            );
        }
    }

    Ok(KeyspaceHandle::new(name.clone(), read_consistency))
}

//! The schema-operation seam.

use strata_types::{ColumnFamilyDescriptor, KeyspaceDescriptor, KeyspaceMetadata, KeyspaceName};

use crate::error::ClusterResult;

/// The three administrative operations the schema bootstrap issues.
///
/// [`ClusterHandle`](crate::ClusterHandle) implements this trait against a
/// live cluster; reconciliation logic is written against the trait so it
/// can be exercised with an in-memory double.
pub trait SchemaOps {
    /// Reads a keyspace's live metadata, including the full list of its
    /// column family names. Returns `None` when the keyspace is absent.
    fn describe_keyspace(&self, name: &KeyspaceName) -> ClusterResult<Option<KeyspaceMetadata>>;

    /// Creates a keyspace with its replication factor, blocking until the
    /// cluster acknowledges schema propagation.
    fn add_keyspace(&self, descriptor: &KeyspaceDescriptor) -> ClusterResult<()>;

    /// Creates a column family with the structure derived from its kind.
    fn add_column_family(
        &self,
        keyspace: &KeyspaceName,
        descriptor: &ColumnFamilyDescriptor,
    ) -> ClusterResult<()>;
}

//! Hand-off boundary to the object-mapping layer.
//!
//! Once reconciliation completes, the keyspace handle is handed to an
//! external object-mapping layer together with a fixed list of source
//! locations to scan for persistence-capable entity types. The mapper's
//! internals are out of scope here; this module only defines the package
//! it receives.

use crate::keyspace::KeyspaceHandle;

/// Module roots the mapping layer scans for persistable entity types.
pub const ENTITY_SCAN_ROOTS: &[&str] = &["domain::entities", "bot::entities"];

/// Everything the object-mapping layer needs after a successful bootstrap.
#[derive(Debug, Clone)]
pub struct MapperBinding {
    /// The reconciled keyspace, carrying its read consistency.
    pub keyspace: KeyspaceHandle,
    /// Source locations to scan for entity types.
    pub scan_roots: Vec<String>,
}

impl MapperBinding {
    pub(crate) fn new(keyspace: KeyspaceHandle) -> Self {
        Self {
            keyspace,
            scan_roots: ENTITY_SCAN_ROOTS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

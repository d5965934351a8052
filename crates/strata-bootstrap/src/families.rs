//! Column family reconciliation.

use std::collections::HashSet;

use strata_cluster::SchemaOps;
use strata_types::{KeyspaceName, SchemaCatalog};
use tracing::{debug, info};

use crate::error::{BootstrapError, BootstrapResult};

/// What a reconciliation pass created versus found in place.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FamilyReport {
    /// Families created by this pass.
    pub created: usize,
    /// Families that already existed (including creations lost to a
    /// concurrent bootstrap).
    pub existing: usize,
}

/// Ensures every family in `catalog` exists in `keyspace`, creating only
/// the missing ones.
///
/// The live family set comes from a single metadata read, so round trips
/// stay constant regardless of catalog size. Descriptors are processed in
/// declared order; families that already exist are never touched — their
/// comparator and validation class stay whatever they were created with.
///
/// Repeated calls against an unchanged catalog issue at most one creation
/// per family ever, zero once the schema has converged.
pub fn reconcile_families<S: SchemaOps + ?Sized>(
    ops: &S,
    keyspace: &KeyspaceName,
    catalog: &SchemaCatalog,
) -> BootstrapResult<FamilyReport> {
    let metadata = ops
        .describe_keyspace(keyspace)
        .map_err(|e| BootstrapError::for_object(keyspace.as_str(), e))?
        .ok_or_else(|| BootstrapError::KeyspaceMissing(keyspace.clone()))?;

    let live: HashSet<&str> = metadata.families.iter().map(|f| f.as_str()).collect();

    let mut report = FamilyReport::default();
    for descriptor in catalog {
        if live.contains(descriptor.name.as_str()) {
            report.existing += 1;
            continue;
        }

        debug!(
            family = %descriptor.name,
            kind = %descriptor.kind,
            "column family does not exist, creating it"
        );
        match ops.add_column_family(keyspace, descriptor) {
            Ok(()) => report.created += 1,
            // No distributed lock guards creation: a concurrent bootstrap
            // may win the race between our metadata read and this call.
            // The cluster answering "already exists" is equivalent to
            // success.
            Err(e) if e.is_already_exists() => {
                debug!(family = %descriptor.name, "column family was created concurrently");
                report.existing += 1;
            }
            Err(e) => return Err(BootstrapError::for_object(descriptor.name.as_str(), e)),
        }
    }

    info!(
        keyspace = %keyspace,
        created = report.created,
        existing = report.existing,
        "column family reconciliation complete"
    );
    Ok(report)
}

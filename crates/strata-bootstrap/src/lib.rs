//! # strata-bootstrap: One-shot schema bootstrap for `Strata`
//!
//! Ensures a target keyspace and a fixed catalog of column families exist
//! before an application begins using them, creating exactly what is
//! missing and nothing more. Runs once, synchronously, at process startup,
//! so every environment converges to the same schema without manual
//! administration.
//!
//! The core is idempotent reconciliation: live cluster metadata is compared
//! against the desired [`SchemaCatalog`](strata_types::SchemaCatalog) and
//! only the missing objects are created. Existing keyspaces and families
//! are never altered — this is an ensure-exists bootstrapper, not a
//! migration system.
//!
//! ## Usage
//!
//! ```ignore
//! use strata_bootstrap::BootstrapConfig;
//!
//! let config = BootstrapConfig::from_env()?;
//! let bootstrap = strata_bootstrap::run(&config)?;
//!
//! // Hand the keyspace to the object-mapping layer.
//! let binding = bootstrap.mapper_binding();
//!
//! // ... serve requests ...
//!
//! bootstrap.shutdown(); // idempotent
//! ```
//!
//! ## Failure semantics
//!
//! Any fatal error aborts startup; there is no partial-schema running mode
//! and no retry loop — operational retry means restarting the process. The
//! single recoverable condition is a malformed replication factor in the
//! configuration, which falls back to 1 with a logged warning.

pub mod catalog;
mod config;
mod error;
mod families;
mod keyspace;
mod lifecycle;
mod mapping;

pub use catalog::default_catalog;
pub use config::BootstrapConfig;
pub use error::{BootstrapError, BootstrapResult};
pub use families::{FamilyReport, reconcile_families};
pub use keyspace::{KeyspaceHandle, ensure_keyspace};
pub use lifecycle::Lifecycle;
pub use mapping::{ENTITY_SCAN_ROOTS, MapperBinding};

use strata_cluster::ClusterHandle;
use strata_types::SchemaCatalog;
use tracing::info;

/// The outcome of a successful bootstrap: the reconciled keyspace handle
/// and the lifecycle owner of the underlying cluster handle.
pub struct Bootstrap {
    keyspace: KeyspaceHandle,
    lifecycle: Lifecycle,
    report: FamilyReport,
}

impl Bootstrap {
    /// The reconciled keyspace.
    pub fn keyspace(&self) -> &KeyspaceHandle {
        &self.keyspace
    }

    /// The cluster handle, for downstream consumers sharing the pool.
    pub fn handle(&self) -> &ClusterHandle {
        self.lifecycle.handle()
    }

    /// What the reconciliation pass created versus found in place.
    pub fn report(&self) -> &FamilyReport {
        &self.report
    }

    /// The hand-off package for the external object-mapping layer.
    pub fn mapper_binding(&self) -> MapperBinding {
        MapperBinding::new(self.keyspace.clone())
    }

    /// Releases the cluster handle. Safe to call more than once; the
    /// remaining release also happens on drop.
    pub fn shutdown(&self) {
        self.lifecycle.shutdown();
    }
}

/// Runs the full bootstrap against the default catalog:
/// connect → ensure keyspace → reconcile column families.
pub fn run(config: &BootstrapConfig) -> BootstrapResult<Bootstrap> {
    run_with_catalog(config, &catalog::default_catalog())
}

/// Runs the full bootstrap against a caller-supplied catalog.
pub fn run_with_catalog(
    config: &BootstrapConfig,
    catalog: &SchemaCatalog,
) -> BootstrapResult<Bootstrap> {
    info!(keyspace = %config.keyspace, "bootstrapping schema");

    let handle =
        ClusterHandle::connect(config.cluster_config()).map_err(BootstrapError::Connection)?;
    let lifecycle = Lifecycle::new(handle);

    let keyspace = ensure_keyspace(
        lifecycle.handle(),
        &config.keyspace,
        config.replication_factor,
        config.read_consistency,
    )?;
    let report = reconcile_families(lifecycle.handle(), &config.keyspace, catalog)?;

    Ok(Bootstrap {
        keyspace,
        lifecycle,
        report,
    })
}

//! Ownership of the process-scoped cluster handle.

use strata_cluster::ClusterHandle;

/// Owns the cluster handle for the lifetime of the process.
///
/// Constructed once at startup; the single teardown entry point is
/// [`Self::shutdown`], which is safe to call any number of times. Dropping
/// the owner also releases the handle, so an early bootstrap failure never
/// leaks pooled connections.
#[derive(Debug)]
pub struct Lifecycle {
    handle: ClusterHandle,
}

impl Lifecycle {
    pub fn new(handle: ClusterHandle) -> Self {
        Self { handle }
    }

    /// The owned handle, for components that need to issue operations.
    pub fn handle(&self) -> &ClusterHandle {
        &self.handle
    }

    /// Releases pooled connections and stops background pool activity.
    ///
    /// The second and subsequent calls are no-ops and never raise an error.
    pub fn shutdown(&self) {
        self.handle.shutdown();
    }
}

impl Drop for Lifecycle {
    fn drop(&mut self) {
        self.handle.shutdown();
    }
}

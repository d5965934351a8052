//! # strata-cluster: Administrative client for `Strata`
//!
//! This crate provides a synchronous client for the schema-metadata API of
//! a `Strata` cluster. It exposes exactly the three administrative
//! operations a schema bootstrap needs — describe-keyspace, add-keyspace
//! and add-column-family — behind the [`SchemaOps`] trait, plus the
//! connection plumbing around them: configuration, a blocking wire
//! connection, and a small connection pool.
//!
//! ## Usage
//!
//! ```ignore
//! use strata_cluster::{ClusterConfig, ClusterHandle, SchemaOps};
//! use strata_types::KeyspaceName;
//!
//! let config = ClusterConfig::new("127.0.0.1:9160", "main")
//!     .with_credentials("svc", "secret")
//!     .with_pool_size(100);
//!
//! let handle = ClusterHandle::connect(config)?;
//! let metadata = handle.describe_keyspace(&KeyspaceName::new("app")?)?;
//!
//! handle.shutdown(); // idempotent
//! ```
//!
//! The handle is an explicitly owned value (cheaply cloneable, internally
//! reference-counted) that is constructed once at startup and passed to
//! every component that needs it. Connections are borrowed from the pool
//! for the duration of a single call and returned before the next one.

mod config;
mod connection;
mod error;
mod handle;
pub mod metrics;
mod ops;
mod pool;

pub use config::{ClusterConfig, DEFAULT_POOL_SIZE};
pub use error::{ClusterError, ClusterResult};
pub use handle::ClusterHandle;
pub use ops::SchemaOps;

#[cfg(test)]
mod tests;

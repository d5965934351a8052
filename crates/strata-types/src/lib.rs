//! # strata-types: Core schema types for `Strata`
//!
//! This crate contains the shared types used across the `Strata` client
//! and bootstrap crates:
//! - Validated names ([`KeyspaceName`], [`FamilyName`])
//! - Replication ([`ReplicationFactor`]) and consistency ([`ConsistencyLevel`])
//! - Schema descriptors ([`KeyspaceDescriptor`], [`ColumnFamilyDescriptor`])
//! - The desired-schema catalog ([`SchemaCatalog`])
//! - Live metadata snapshots ([`KeyspaceMetadata`])

use std::collections::HashSet;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum length in bytes for keyspace and column family names.
pub const MAX_NAME_LENGTH: usize = 48;

/// Errors produced when validating a keyspace or column family name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    /// The name is empty.
    #[error("name is empty")]
    Empty,

    /// The name contains a character outside `[A-Za-z0-9_]`.
    #[error("name `{name}` contains invalid character `{found}`")]
    InvalidCharacter { name: String, found: char },

    /// The name exceeds [`MAX_NAME_LENGTH`] bytes.
    #[error("name `{0}` exceeds {MAX_NAME_LENGTH} bytes")]
    TooLong(String),
}

fn validate_name(name: &str) -> Result<(), NameError> {
    if name.is_empty() {
        return Err(NameError::Empty);
    }
    if name.len() > MAX_NAME_LENGTH {
        return Err(NameError::TooLong(name.to_string()));
    }
    if let Some(found) = name
        .chars()
        .find(|c| !c.is_ascii_alphanumeric() && *c != '_')
    {
        return Err(NameError::InvalidCharacter {
            name: name.to_string(),
            found,
        });
    }
    Ok(())
}

// ============================================================================
// Names
// ============================================================================

/// Name of a keyspace, the top-level namespace containing column families.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct KeyspaceName(String);

impl KeyspaceName {
    /// Creates a keyspace name, validating its characters and length.
    pub fn new(name: impl Into<String>) -> Result<Self, NameError> {
        let name = name.into();
        validate_name(&name)?;
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for KeyspaceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Name of a column family, unique within its keyspace.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FamilyName(String);

impl FamilyName {
    /// Creates a column family name, validating its characters and length.
    pub fn new(name: impl Into<String>) -> Result<Self, NameError> {
        let name = name.into();
        validate_name(&name)?;
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for FamilyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Replication and consistency
// ============================================================================

/// Number of replicas each row of a keyspace is stored on.
///
/// Always at least 1. Applied only when a keyspace is created; never
/// re-asserted against an existing keyspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ReplicationFactor(u32);

impl ReplicationFactor {
    /// The fallback factor used when configuration is absent or malformed.
    pub const DEFAULT: ReplicationFactor = ReplicationFactor(1);

    pub fn new(factor: u32) -> Self {
        debug_assert!(factor >= 1, "replication factor must be at least 1");
        Self(factor.max(1))
    }

    pub fn get(&self) -> u32 {
        self.0
    }

    /// Parses a configuration string, substituting [`Self::DEFAULT`] when the
    /// input is not a positive integer.
    ///
    /// Returns the factor together with `true` when the fallback was taken,
    /// so the caller can emit a configuration warning.
    pub fn parse_lossy(input: &str) -> (Self, bool) {
        match input.trim().parse::<i64>() {
            Ok(n) if n >= 1 && n <= i64::from(u32::MAX) => (Self(n as u32), false),
            _ => (Self::DEFAULT, true),
        }
    }
}

impl Default for ReplicationFactor {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl Display for ReplicationFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Number of replica acknowledgements required before a read completes.
///
/// The default is the weakest single-replica level; downstream consumers
/// sharing the cluster handle inherit it unless they override.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConsistencyLevel {
    /// A single replica acknowledgement.
    #[default]
    One,
    /// A majority of replicas.
    Quorum,
    /// Every replica.
    All,
}

impl Display for ConsistencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::One => f.write_str("one"),
            Self::Quorum => f.write_str("quorum"),
            Self::All => f.write_str("all"),
        }
    }
}

// ============================================================================
// Descriptors
// ============================================================================

/// Structural kind of a column family.
///
/// The kind is fixed at creation time; the bootstrap never alters the
/// comparator or validation class of a family that already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FamilyKind {
    /// Rows addressed and compared by the store's default key ordering.
    /// Used for single-entity lookup by exact identifier.
    Plain,
    /// Columns within a row ordered by a time-derived, monotonically
    /// increasing identifier, so entries come back in chronological order.
    /// Used for activity timelines and feeds.
    TimeOrdered,
    /// Holds only atomic increment/decrement values, marked with a distinct
    /// validation class. Used for aggregate tallies.
    Counter,
}

impl Display for FamilyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain => f.write_str("plain"),
            Self::TimeOrdered => f.write_str("time-ordered"),
            Self::Counter => f.write_str("counter"),
        }
    }
}

/// Desired definition of a keyspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyspaceDescriptor {
    pub name: KeyspaceName,
    pub replication_factor: ReplicationFactor,
}

impl KeyspaceDescriptor {
    pub fn new(name: KeyspaceName, replication_factor: ReplicationFactor) -> Self {
        Self {
            name,
            replication_factor,
        }
    }
}

/// Desired definition of a column family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnFamilyDescriptor {
    pub name: FamilyName,
    pub kind: FamilyKind,
    /// Row cache hint. Currently always 0 (caching disabled); threaded
    /// through to the creation request for future tuning.
    pub row_cache_keys: u32,
}

impl ColumnFamilyDescriptor {
    pub fn new(name: FamilyName, kind: FamilyKind) -> Self {
        Self {
            name,
            kind,
            row_cache_keys: 0,
        }
    }

    pub fn with_row_cache_keys(mut self, keys: u32) -> Self {
        self.row_cache_keys = keys;
        self
    }
}

// ============================================================================
// Catalog
// ============================================================================

/// Errors produced when assembling a [`SchemaCatalog`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Name(#[from] NameError),

    /// The same family name was declared twice.
    #[error("duplicate column family name `{0}`")]
    Duplicate(String),
}

/// The fixed, ordered list of column families an application requires.
///
/// Families are grouped by kind: all [`FamilyKind::Plain`] entries first,
/// then [`FamilyKind::TimeOrdered`], then [`FamilyKind::Counter`]. Entity
/// tables precede derived indexes by convention; iteration preserves the
/// declaration order within each group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaCatalog {
    families: Vec<ColumnFamilyDescriptor>,
}

impl SchemaCatalog {
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColumnFamilyDescriptor> {
        self.families.iter()
    }

    pub fn len(&self) -> usize {
        self.families.len()
    }

    pub fn is_empty(&self) -> bool {
        self.families.is_empty()
    }

    /// Number of families of the given kind.
    pub fn count_of(&self, kind: FamilyKind) -> usize {
        self.families.iter().filter(|f| f.kind == kind).count()
    }
}

impl<'a> IntoIterator for &'a SchemaCatalog {
    type Item = &'a ColumnFamilyDescriptor;
    type IntoIter = std::slice::Iter<'a, ColumnFamilyDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.families.iter()
    }
}

/// Builder assembling a [`SchemaCatalog`] from a data table of names.
///
/// Declaration order is preserved within each kind group; the groups are
/// emitted plain → time-ordered → counter regardless of interleaving.
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    plain: Vec<String>,
    time_ordered: Vec<String>,
    counter: Vec<String>,
}

impl CatalogBuilder {
    pub fn plain(mut self, name: impl Into<String>) -> Self {
        self.plain.push(name.into());
        self
    }

    pub fn time_ordered(mut self, name: impl Into<String>) -> Self {
        self.time_ordered.push(name.into());
        self
    }

    pub fn counter(mut self, name: impl Into<String>) -> Self {
        self.counter.push(name.into());
        self
    }

    /// Validates every name, rejects duplicates, and produces the catalog.
    pub fn build(self) -> Result<SchemaCatalog, CatalogError> {
        let groups = [
            (FamilyKind::Plain, self.plain),
            (FamilyKind::TimeOrdered, self.time_ordered),
            (FamilyKind::Counter, self.counter),
        ];

        let mut seen = HashSet::new();
        let mut families = Vec::new();
        for (kind, names) in groups {
            for name in names {
                if !seen.insert(name.clone()) {
                    return Err(CatalogError::Duplicate(name));
                }
                families.push(ColumnFamilyDescriptor::new(FamilyName::new(name)?, kind));
            }
        }

        Ok(SchemaCatalog { families })
    }
}

// ============================================================================
// Live metadata
// ============================================================================

/// Snapshot of a keyspace's live schema, as reported by the cluster.
///
/// A single describe operation returns the full family list, so one
/// metadata read per reconciliation pass is sufficient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyspaceMetadata {
    pub name: KeyspaceName,
    pub replication_factor: ReplicationFactor,
    pub families: Vec<FamilyName>,
}

impl KeyspaceMetadata {
    pub fn contains_family(&self, name: &FamilyName) -> bool {
        self.families.iter().any(|f| f == name)
    }
}

#[cfg(test)]
mod tests;

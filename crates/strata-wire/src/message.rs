//! Request and response message types for the administrative protocol.
//!
//! Messages are serialized with bincode. The request surface is exactly the
//! three schema operations the bootstrap issues, plus the handshake that
//! opens a connection.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use strata_types::{
    ColumnFamilyDescriptor, FamilyKind, FamilyName, KeyspaceDescriptor, KeyspaceMetadata,
    KeyspaceName,
};

use crate::error::{WireError, WireResult};
use crate::frame::Frame;

/// Unique identifier for a request, used to match responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(pub u64);

impl RequestId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

// ============================================================================
// Structural markers
// ============================================================================

/// Ordering rule applied to column names within a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnOrdering {
    /// The store's default key ordering.
    KeyOrder,
    /// Time-derived, monotonically increasing identifiers; a row's entries
    /// scan back in chronological order.
    TimeUuid,
}

/// Validation class applied to column values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueValidation {
    /// Arbitrary opaque values.
    Opaque,
    /// Distributed increment/decrement counters only.
    Counter,
}

/// The wire-level structure of a column family, derived from its kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyLayout {
    pub ordering: ColumnOrdering,
    pub validation: ValueValidation,
}

impl FamilyLayout {
    /// Maps a structural kind onto its comparator and validation markers.
    pub fn for_kind(kind: FamilyKind) -> Self {
        match kind {
            FamilyKind::Plain => Self {
                ordering: ColumnOrdering::KeyOrder,
                validation: ValueValidation::Opaque,
            },
            FamilyKind::TimeOrdered => Self {
                ordering: ColumnOrdering::TimeUuid,
                validation: ValueValidation::Opaque,
            },
            FamilyKind::Counter => Self {
                ordering: ColumnOrdering::KeyOrder,
                validation: ValueValidation::Counter,
            },
        }
    }
}

// ============================================================================
// Request Types
// ============================================================================

/// A client request to the cluster's schema-metadata API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminRequest {
    /// Unique request identifier.
    pub id: RequestId,
    /// The request payload.
    pub payload: AdminRequestPayload,
}

impl AdminRequest {
    pub fn new(id: RequestId, payload: AdminRequestPayload) -> Self {
        Self { id, payload }
    }

    /// Encodes the request to a frame.
    pub fn to_frame(&self) -> WireResult<Frame> {
        let payload =
            bincode::serialize(self).map_err(|e| WireError::Serialization(e.to_string()))?;
        Ok(Frame::new(Bytes::from(payload)))
    }

    /// Decodes a request from a frame.
    pub fn from_frame(frame: &Frame) -> WireResult<Self> {
        bincode::deserialize(&frame.payload).map_err(WireError::from)
    }
}

/// Request payload variants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AdminRequestPayload {
    /// Handshake to establish a connection.
    Handshake(HandshakeRequest),
    /// Read a keyspace's live metadata.
    DescribeKeyspace(DescribeKeyspaceRequest),
    /// Create a keyspace.
    AddKeyspace(AddKeyspaceRequest),
    /// Create a column family.
    AddColumnFamily(AddColumnFamilyRequest),
}

/// Credentials presented during the handshake.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Handshake request opening a connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandshakeRequest {
    /// Client protocol version.
    pub client_version: u16,
    /// Name of the cluster the client expects to reach.
    pub cluster_name: String,
    /// Optional authentication credentials.
    pub credentials: Option<Credentials>,
}

/// Describe-keyspace request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DescribeKeyspaceRequest {
    pub keyspace: KeyspaceName,
}

/// Add-keyspace request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddKeyspaceRequest {
    pub descriptor: KeyspaceDescriptor,
    /// When set, the server replies only after the schema change has
    /// propagated to the cluster.
    pub wait_for_propagation: bool,
}

/// Add-column-family request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddColumnFamilyRequest {
    pub keyspace: KeyspaceName,
    pub name: FamilyName,
    pub layout: FamilyLayout,
    /// Row cache hint; 0 disables caching.
    pub row_cache_keys: u32,
}

impl AddColumnFamilyRequest {
    /// Builds the creation request for a descriptor, applying the kind →
    /// structure mapping.
    pub fn for_descriptor(keyspace: KeyspaceName, descriptor: &ColumnFamilyDescriptor) -> Self {
        Self {
            keyspace,
            name: descriptor.name.clone(),
            layout: FamilyLayout::for_kind(descriptor.kind),
            row_cache_keys: descriptor.row_cache_keys,
        }
    }
}

// ============================================================================
// Response Types
// ============================================================================

/// A server response to an administrative request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminResponse {
    /// Request ID this is responding to.
    pub request_id: RequestId,
    /// The response payload.
    pub payload: AdminResponsePayload,
}

impl AdminResponse {
    pub fn new(request_id: RequestId, payload: AdminResponsePayload) -> Self {
        Self {
            request_id,
            payload,
        }
    }

    /// Creates an error response.
    pub fn error(request_id: RequestId, code: ErrorCode, message: String) -> Self {
        Self {
            request_id,
            payload: AdminResponsePayload::Error(ErrorResponse { code, message }),
        }
    }

    /// Encodes the response to a frame.
    pub fn to_frame(&self) -> WireResult<Frame> {
        let payload =
            bincode::serialize(self).map_err(|e| WireError::Serialization(e.to_string()))?;
        Ok(Frame::new(Bytes::from(payload)))
    }

    /// Decodes a response from a frame.
    pub fn from_frame(frame: &Frame) -> WireResult<Self> {
        bincode::deserialize(&frame.payload).map_err(WireError::from)
    }
}

/// Response payload variants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AdminResponsePayload {
    /// Error response.
    Error(ErrorResponse),
    /// Handshake response.
    Handshake(HandshakeResponse),
    /// Describe-keyspace response.
    DescribeKeyspace(DescribeKeyspaceResponse),
    /// Add-keyspace response.
    AddKeyspace(AddKeyspaceResponse),
    /// Add-column-family response.
    AddColumnFamily(AddColumnFamilyResponse),
}

/// Error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code.
    pub code: ErrorCode,
    /// Human-readable error message.
    pub message: String,
}

/// Error codes reported by the schema-metadata API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u16)]
pub enum ErrorCode {
    /// Unknown error.
    Unknown = 0,
    /// Internal server error.
    InternalError = 1,
    /// Invalid request format.
    InvalidRequest = 2,
    /// Authentication failed.
    AuthenticationFailed = 3,
    /// Keyspace already exists.
    KeyspaceAlreadyExists = 4,
    /// Column family already exists.
    FamilyAlreadyExists = 5,
    /// Keyspace not found.
    KeyspaceNotFound = 6,
    /// Descriptor rejected (bad name, unsupported layout).
    InvalidDescriptor = 7,
    /// Cluster cannot serve schema operations right now.
    Unavailable = 8,
}

impl ErrorCode {
    /// Whether the code reports a creation that lost a race with an
    /// identical concurrent creation.
    pub fn is_already_exists(&self) -> bool {
        matches!(self, Self::KeyspaceAlreadyExists | Self::FamilyAlreadyExists)
    }
}

/// Handshake response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandshakeResponse {
    /// Server protocol version.
    pub server_version: u16,
    /// Name of the cluster that answered.
    pub cluster_name: String,
    /// Whether authentication succeeded.
    pub authenticated: bool,
}

/// Describe-keyspace response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DescribeKeyspaceResponse {
    /// Live metadata, or `None` when the keyspace does not exist.
    pub keyspace: Option<KeyspaceMetadata>,
}

/// Add-keyspace response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddKeyspaceResponse {
    /// Schema version the cluster converged on after the change.
    pub schema_version: u64,
}

/// Add-column-family response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddColumnFamilyResponse {
    /// Schema version the cluster converged on after the change.
    pub schema_version: u64,
}

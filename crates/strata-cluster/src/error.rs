//! Client error types.

use strata_wire::{ErrorCode, WireError};
use thiserror::Error;

/// Result type for cluster client operations.
pub type ClusterResult<T> = Result<T, ClusterError>;

/// Errors that can occur while talking to the cluster.
#[derive(Debug, Error)]
pub enum ClusterError {
    /// Connection error: the cluster is unreachable or the stream broke.
    #[error("connection error: {0}")]
    Connection(#[from] std::io::Error),

    /// Wire protocol error.
    #[error("wire protocol error: {0}")]
    Wire(#[from] WireError),

    /// Handshake failed (version mismatch, malformed reply).
    #[error("handshake failed: {0}")]
    HandshakeFailed(String),

    /// The cluster rejected the presented credentials.
    #[error("authentication rejected: {0}")]
    AuthenticationRejected(String),

    /// The cluster rejected a schema operation.
    #[error("schema operation rejected ({code:?}): {message}")]
    Rejected { code: ErrorCode, message: String },

    /// Response ID mismatch.
    #[error("response ID {received} does not match request ID {expected}")]
    ResponseMismatch { expected: u64, received: u64 },

    /// Unexpected response type.
    #[error("unexpected response type: expected {expected}, got {actual}")]
    UnexpectedResponse { expected: String, actual: String },

    /// The connection pool has been shut down.
    #[error("connection pool is shut down")]
    PoolClosed,

    /// Every pooled connection is in use and the cap is reached.
    #[error("connection pool exhausted ({cap} connections in use)")]
    PoolExhausted { cap: usize },
}

impl ClusterError {
    /// Creates a rejection error from a server error response.
    pub fn rejected(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Rejected {
            code,
            message: message.into(),
        }
    }

    /// Whether this error reports a creation that lost a race with an
    /// identical concurrent creation ("object already exists").
    pub fn is_already_exists(&self) -> bool {
        matches!(self, Self::Rejected { code, .. } if code.is_already_exists())
    }
}

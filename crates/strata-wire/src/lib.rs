//! # strata-wire: Administrative wire protocol for `Strata`
//!
//! This crate defines the binary protocol a client uses to talk to the
//! cluster's schema-metadata API. It deliberately covers only the
//! administrative surface the bootstrap needs: a connection handshake and
//! three operation shapes — describe-keyspace (read), add-keyspace (write)
//! and add-column-family (write). No data-path operation is defined here.
//!
//! ## Frame Format
//!
//! ```text
//! ┌─────────┬─────────┬──────────┬──────────┬──────────────────┐
//! │ Magic   │ Version │ Length   │ Checksum │     Payload      │
//! │ (4 B)   │ (2 B)   │ (4 B)    │ (4 B)    │     (var)        │
//! └─────────┴─────────┴──────────┴──────────┴──────────────────┘
//! ```
//!
//! - **Magic**: `0x53545241` ("STRA")
//! - **Version**: Protocol version (currently 1)
//! - **Length**: Payload length in bytes (max 1 MiB; schema messages are small)
//! - **Checksum**: CRC32 of the payload
//! - **Payload**: Bincode-encoded [`AdminRequest`] or [`AdminResponse`]

mod error;
mod frame;
mod message;

pub use error::{WireError, WireResult};
pub use frame::{FRAME_HEADER_SIZE, Frame, FrameHeader, MAGIC, MAX_PAYLOAD_SIZE, PROTOCOL_VERSION};
pub use message::{
    AddColumnFamilyRequest, AddColumnFamilyResponse, AddKeyspaceRequest, AddKeyspaceResponse,
    AdminRequest, AdminRequestPayload, AdminResponse, AdminResponsePayload, ColumnOrdering,
    Credentials, DescribeKeyspaceRequest, DescribeKeyspaceResponse, ErrorCode, ErrorResponse,
    FamilyLayout, HandshakeRequest, HandshakeResponse, RequestId, ValueValidation,
};

//! Blocking wire connection to the cluster's schema-metadata API.

use std::io::{Read, Write};
use std::net::{TcpStream, ToSocketAddrs};

use bytes::BytesMut;
use strata_types::{ColumnFamilyDescriptor, KeyspaceDescriptor, KeyspaceMetadata, KeyspaceName};
use strata_wire::{
    AddColumnFamilyRequest, AddKeyspaceRequest, AdminRequest, AdminRequestPayload, AdminResponse,
    AdminResponsePayload, DescribeKeyspaceRequest, ErrorCode, Frame, HandshakeRequest,
    MAX_PAYLOAD_SIZE, PROTOCOL_VERSION, RequestId,
};
use tracing::debug;

use crate::config::ClusterConfig;
use crate::error::{ClusterError, ClusterResult};

/// A single blocking connection, holding the TCP stream and a read buffer.
///
/// One request is in flight at a time; the response is matched against the
/// request ID before being returned.
pub(crate) struct AdminConnection {
    stream: TcpStream,
    next_request_id: u64,
    read_buf: BytesMut,
}

impl AdminConnection {
    /// Dials the configured contact point and performs the handshake.
    ///
    /// Fails when the cluster is unreachable or the credentials are
    /// rejected.
    pub(crate) fn open(config: &ClusterConfig) -> ClusterResult<Self> {
        let addr = config
            .host
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| ClusterError::HandshakeFailed(format!("cannot resolve {}", config.host)))?;

        let stream = TcpStream::connect_timeout(&addr, config.connect_timeout)?;
        stream.set_read_timeout(config.read_timeout)?;
        stream.set_write_timeout(config.write_timeout)?;

        let mut connection = Self {
            stream,
            next_request_id: 1,
            read_buf: BytesMut::with_capacity(16 * 1024),
        };
        connection.handshake(config)?;

        debug!(host = %config.host, "opened administrative connection");
        Ok(connection)
    }

    /// Performs the handshake, presenting credentials when configured.
    fn handshake(&mut self, config: &ClusterConfig) -> ClusterResult<()> {
        let response = self.send_request(AdminRequestPayload::Handshake(HandshakeRequest {
            client_version: PROTOCOL_VERSION,
            cluster_name: config.cluster_name.clone(),
            credentials: config.credentials(),
        }))?;

        match response.payload {
            AdminResponsePayload::Handshake(h) => {
                if h.server_version != PROTOCOL_VERSION {
                    return Err(ClusterError::HandshakeFailed(format!(
                        "protocol version mismatch: client {}, server {}",
                        PROTOCOL_VERSION, h.server_version
                    )));
                }
                if !h.authenticated {
                    return Err(ClusterError::AuthenticationRejected(
                        "cluster requires valid credentials".to_string(),
                    ));
                }
                Ok(())
            }
            AdminResponsePayload::Error(e) if e.code == ErrorCode::AuthenticationFailed => {
                Err(ClusterError::AuthenticationRejected(e.message))
            }
            AdminResponsePayload::Error(e) => Err(ClusterError::rejected(e.code, e.message)),
            other => Err(unexpected("Handshake", &other)),
        }
    }

    /// Reads a keyspace's live metadata; `None` when it does not exist.
    pub(crate) fn describe_keyspace(
        &mut self,
        name: &KeyspaceName,
    ) -> ClusterResult<Option<KeyspaceMetadata>> {
        let response =
            self.send_request(AdminRequestPayload::DescribeKeyspace(DescribeKeyspaceRequest {
                keyspace: name.clone(),
            }))?;

        match response.payload {
            AdminResponsePayload::DescribeKeyspace(d) => Ok(d.keyspace),
            AdminResponsePayload::Error(e) => Err(ClusterError::rejected(e.code, e.message)),
            other => Err(unexpected("DescribeKeyspace", &other)),
        }
    }

    /// Creates a keyspace, blocking until the cluster acknowledges that the
    /// schema change has propagated.
    pub(crate) fn add_keyspace(&mut self, descriptor: &KeyspaceDescriptor) -> ClusterResult<()> {
        let response = self.send_request(AdminRequestPayload::AddKeyspace(AddKeyspaceRequest {
            descriptor: descriptor.clone(),
            wait_for_propagation: true,
        }))?;

        match response.payload {
            AdminResponsePayload::AddKeyspace(_) => Ok(()),
            AdminResponsePayload::Error(e) => Err(ClusterError::rejected(e.code, e.message)),
            other => Err(unexpected("AddKeyspace", &other)),
        }
    }

    /// Creates a column family with the structure derived from its kind.
    pub(crate) fn add_column_family(
        &mut self,
        keyspace: &KeyspaceName,
        descriptor: &ColumnFamilyDescriptor,
    ) -> ClusterResult<()> {
        let request = AddColumnFamilyRequest::for_descriptor(keyspace.clone(), descriptor);
        let response = self.send_request(AdminRequestPayload::AddColumnFamily(request))?;

        match response.payload {
            AdminResponsePayload::AddColumnFamily(_) => Ok(()),
            AdminResponsePayload::Error(e) => Err(ClusterError::rejected(e.code, e.message)),
            other => Err(unexpected("AddColumnFamily", &other)),
        }
    }

    /// Sends a request and waits for its response.
    fn send_request(&mut self, payload: AdminRequestPayload) -> ClusterResult<AdminResponse> {
        let request_id = RequestId::new(self.next_request_id);
        self.next_request_id += 1;

        let request = AdminRequest::new(request_id, payload);
        let frame = request.to_frame()?;

        let mut write_buf = BytesMut::new();
        frame.encode(&mut write_buf);
        self.stream.write_all(&write_buf)?;
        self.stream.flush()?;

        let response = self.read_response()?;
        if response.request_id.0 != request_id.0 {
            return Err(ClusterError::ResponseMismatch {
                expected: request_id.0,
                received: response.request_id.0,
            });
        }

        Ok(response)
    }

    /// Reads one response frame from the stream.
    fn read_response(&mut self) -> ClusterResult<AdminResponse> {
        loop {
            if let Some(frame) = Frame::decode(&mut self.read_buf)? {
                return Ok(AdminResponse::from_frame(&frame)?);
            }

            let mut temp_buf = [0u8; 4096];
            let n = self.stream.read(&mut temp_buf)?;
            if n == 0 {
                return Err(ClusterError::Connection(std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    "cluster closed connection",
                )));
            }
            self.read_buf.extend_from_slice(&temp_buf[..n]);

            if self.read_buf.len() > MAX_PAYLOAD_SIZE as usize * 2 {
                return Err(ClusterError::Connection(std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    "response too large",
                )));
            }
        }
    }
}

impl std::fmt::Debug for AdminConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminConnection")
            .field("next_request_id", &self.next_request_id)
            .finish_non_exhaustive()
    }
}

fn unexpected(expected: &str, actual: &AdminResponsePayload) -> ClusterError {
    ClusterError::UnexpectedResponse {
        expected: expected.to_string(),
        actual: format!("{actual:?}"),
    }
}

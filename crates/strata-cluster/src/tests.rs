//! Integration tests for the cluster client, driven against a scripted
//! in-process coordinator speaking the administrative wire protocol.

use std::collections::BTreeMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use bytes::BytesMut;
use strata_types::{
    ColumnFamilyDescriptor, FamilyKind, FamilyName, KeyspaceDescriptor, KeyspaceMetadata,
    KeyspaceName, ReplicationFactor,
};
use strata_wire::{
    AdminRequest, AdminRequestPayload, AdminResponse, AdminResponsePayload,
    DescribeKeyspaceResponse, ErrorCode, Frame, HandshakeResponse, PROTOCOL_VERSION,
    AddColumnFamilyResponse, AddKeyspaceResponse,
};

use crate::{ClusterConfig, ClusterError, ClusterHandle, SchemaOps};

// ============================================================================
// Test coordinator
// ============================================================================

/// In-memory schema held by the coordinator: keyspace → (factor, families).
#[derive(Default)]
struct CoordinatorState {
    keyspaces: BTreeMap<String, (u32, Vec<String>)>,
    /// When set, handshakes must present exactly these credentials.
    required_credentials: Option<(String, String)>,
    schema_version: u64,
}

/// Starts a coordinator on an OS-assigned port and returns its address plus
/// a handle on its schema state. The accept loop runs on a detached thread
/// for the remainder of the test process.
fn start_coordinator(state: CoordinatorState) -> (String, Arc<Mutex<CoordinatorState>>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind coordinator");
    let addr = listener.local_addr().expect("coordinator addr").to_string();
    let state = Arc::new(Mutex::new(state));

    let accept_state = Arc::clone(&state);
    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(stream) = stream else { return };
            let conn_state = Arc::clone(&accept_state);
            thread::spawn(move || serve_connection(stream, conn_state));
        }
    });

    (addr, state)
}

fn serve_connection(mut stream: TcpStream, state: Arc<Mutex<CoordinatorState>>) {
    let mut buf = BytesMut::new();
    let mut tmp = [0u8; 4096];
    loop {
        while let Ok(Some(frame)) = Frame::decode(&mut buf) {
            let Ok(request) = AdminRequest::from_frame(&frame) else {
                return;
            };
            let response = respond(&state, request);
            let Ok(frame) = response.to_frame() else { return };
            if stream.write_all(&frame.encode_to_bytes()).is_err() {
                return;
            }
        }
        match stream.read(&mut tmp) {
            Ok(0) | Err(_) => return,
            Ok(n) => buf.extend_from_slice(&tmp[..n]),
        }
    }
}

fn respond(state: &Mutex<CoordinatorState>, request: AdminRequest) -> AdminResponse {
    let mut state = state.lock().unwrap();
    let id = request.id;
    match request.payload {
        AdminRequestPayload::Handshake(h) => {
            let authenticated = match &state.required_credentials {
                None => true,
                Some((username, password)) => h
                    .credentials
                    .as_ref()
                    .is_some_and(|c| c.username == *username && c.password == *password),
            };
            if !authenticated {
                return AdminResponse::error(
                    id,
                    ErrorCode::AuthenticationFailed,
                    "bad credentials".to_string(),
                );
            }
            AdminResponse::new(
                id,
                AdminResponsePayload::Handshake(HandshakeResponse {
                    server_version: PROTOCOL_VERSION,
                    cluster_name: h.cluster_name,
                    authenticated: true,
                }),
            )
        }
        AdminRequestPayload::DescribeKeyspace(d) => {
            let keyspace = state.keyspaces.get(d.keyspace.as_str()).map(|(factor, families)| {
                KeyspaceMetadata {
                    name: d.keyspace.clone(),
                    replication_factor: ReplicationFactor::new(*factor),
                    families: families
                        .iter()
                        .map(|f| FamilyName::new(f.clone()).unwrap())
                        .collect(),
                }
            });
            AdminResponse::new(
                id,
                AdminResponsePayload::DescribeKeyspace(DescribeKeyspaceResponse { keyspace }),
            )
        }
        AdminRequestPayload::AddKeyspace(a) => {
            let name = a.descriptor.name.as_str().to_string();
            if state.keyspaces.contains_key(&name) {
                return AdminResponse::error(
                    id,
                    ErrorCode::KeyspaceAlreadyExists,
                    format!("keyspace {name} already exists"),
                );
            }
            let factor = a.descriptor.replication_factor.get();
            state.keyspaces.insert(name, (factor, Vec::new()));
            state.schema_version += 1;
            let schema_version = state.schema_version;
            AdminResponse::new(
                id,
                AdminResponsePayload::AddKeyspace(AddKeyspaceResponse { schema_version }),
            )
        }
        AdminRequestPayload::AddColumnFamily(a) => {
            let Some((_, families)) = state.keyspaces.get_mut(a.keyspace.as_str()) else {
                return AdminResponse::error(
                    id,
                    ErrorCode::KeyspaceNotFound,
                    format!("keyspace {} not found", a.keyspace),
                );
            };
            let name = a.name.as_str().to_string();
            if families.contains(&name) {
                return AdminResponse::error(
                    id,
                    ErrorCode::FamilyAlreadyExists,
                    format!("column family {name} already exists"),
                );
            }
            families.push(name);
            state.schema_version += 1;
            let schema_version = state.schema_version;
            AdminResponse::new(
                id,
                AdminResponsePayload::AddColumnFamily(AddColumnFamilyResponse { schema_version }),
            )
        }
    }
}

fn test_config(addr: &str) -> ClusterConfig {
    ClusterConfig::new(addr, "test-cluster")
        .with_connect_timeout(Duration::from_secs(2))
        .with_pool_size(4)
}

fn keyspace(name: &str) -> KeyspaceName {
    KeyspaceName::new(name).unwrap()
}

// ============================================================================
// Connection and handshake
// ============================================================================

#[test]
fn connect_succeeds_against_open_coordinator() {
    let (addr, _) = start_coordinator(CoordinatorState::default());
    let handle = ClusterHandle::connect(test_config(&addr)).expect("connect");
    assert!(!handle.is_shut_down());
}

#[test]
fn connect_fails_when_unreachable() {
    // Bind then drop a listener so the port is known-closed.
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().to_string()
    };

    let result = ClusterHandle::connect(test_config(&addr));
    assert!(matches!(result, Err(ClusterError::Connection(_))));
}

#[test]
fn connect_fails_on_rejected_credentials() {
    let (addr, _) = start_coordinator(CoordinatorState {
        required_credentials: Some(("svc".to_string(), "secret".to_string())),
        ..CoordinatorState::default()
    });

    let config = test_config(&addr).with_credentials("svc", "wrong");
    let result = ClusterHandle::connect(config);
    assert!(matches!(result, Err(ClusterError::AuthenticationRejected(_))));
}

#[test]
fn connect_presents_credentials_only_with_username() {
    // An empty username means no credentials on the wire; the coordinator
    // requires none, so the handshake passes.
    let (addr, _) = start_coordinator(CoordinatorState::default());
    let config = test_config(&addr).with_credentials("", "ignored");
    assert!(config.credentials().is_none());
    assert!(ClusterHandle::connect(config).is_ok());
}

#[test]
fn connect_authenticates_with_matching_credentials() {
    let (addr, _) = start_coordinator(CoordinatorState {
        required_credentials: Some(("svc".to_string(), "secret".to_string())),
        ..CoordinatorState::default()
    });

    let config = test_config(&addr).with_credentials("svc", "secret");
    assert!(ClusterHandle::connect(config).is_ok());
}

// ============================================================================
// Schema operations
// ============================================================================

#[test]
fn describe_missing_keyspace_returns_none() {
    let (addr, _) = start_coordinator(CoordinatorState::default());
    let handle = ClusterHandle::connect(test_config(&addr)).unwrap();

    let metadata = handle.describe_keyspace(&keyspace("absent")).unwrap();
    assert!(metadata.is_none());
}

#[test]
fn add_keyspace_then_describe_reports_factor() {
    let (addr, _) = start_coordinator(CoordinatorState::default());
    let handle = ClusterHandle::connect(test_config(&addr)).unwrap();

    let descriptor = KeyspaceDescriptor::new(keyspace("app"), ReplicationFactor::new(3));
    handle.add_keyspace(&descriptor).unwrap();

    let metadata = handle.describe_keyspace(&keyspace("app")).unwrap().unwrap();
    assert_eq!(metadata.replication_factor.get(), 3);
    assert!(metadata.families.is_empty());
}

#[test]
fn add_column_family_appears_in_describe() {
    let (addr, _) = start_coordinator(CoordinatorState::default());
    let handle = ClusterHandle::connect(test_config(&addr)).unwrap();

    handle
        .add_keyspace(&KeyspaceDescriptor::new(keyspace("app"), ReplicationFactor::new(1)))
        .unwrap();

    let descriptor =
        ColumnFamilyDescriptor::new(FamilyName::new("users").unwrap(), FamilyKind::Plain);
    handle.add_column_family(&keyspace("app"), &descriptor).unwrap();

    let metadata = handle.describe_keyspace(&keyspace("app")).unwrap().unwrap();
    assert!(metadata.contains_family(&FamilyName::new("users").unwrap()));
}

#[test]
fn duplicate_family_creation_reports_already_exists() {
    let (addr, _) = start_coordinator(CoordinatorState::default());
    let handle = ClusterHandle::connect(test_config(&addr)).unwrap();

    handle
        .add_keyspace(&KeyspaceDescriptor::new(keyspace("app"), ReplicationFactor::new(1)))
        .unwrap();

    let descriptor =
        ColumnFamilyDescriptor::new(FamilyName::new("users").unwrap(), FamilyKind::Plain);
    handle.add_column_family(&keyspace("app"), &descriptor).unwrap();

    let err = handle
        .add_column_family(&keyspace("app"), &descriptor)
        .unwrap_err();
    assert!(err.is_already_exists());
    assert!(matches!(
        err,
        ClusterError::Rejected {
            code: ErrorCode::FamilyAlreadyExists,
            ..
        }
    ));
}

#[test]
fn duplicate_keyspace_creation_reports_already_exists() {
    let (addr, _) = start_coordinator(CoordinatorState::default());
    let handle = ClusterHandle::connect(test_config(&addr)).unwrap();

    let descriptor = KeyspaceDescriptor::new(keyspace("app"), ReplicationFactor::new(1));
    handle.add_keyspace(&descriptor).unwrap();

    let err = handle.add_keyspace(&descriptor).unwrap_err();
    assert!(err.is_already_exists());
}

// ============================================================================
// Lifecycle
// ============================================================================

#[test]
fn shutdown_is_idempotent() {
    let (addr, _) = start_coordinator(CoordinatorState::default());
    let handle = ClusterHandle::connect(test_config(&addr)).unwrap();

    handle.shutdown();
    assert!(handle.is_shut_down());

    // Second and third calls are no-ops and must never error.
    handle.shutdown();
    handle.shutdown();
    assert!(handle.is_shut_down());
}

#[test]
fn operations_after_shutdown_fail_with_pool_closed() {
    let (addr, _) = start_coordinator(CoordinatorState::default());
    let handle = ClusterHandle::connect(test_config(&addr)).unwrap();

    handle.shutdown();
    let result = handle.describe_keyspace(&keyspace("app"));
    assert!(matches!(result, Err(ClusterError::PoolClosed)));
}

#[test]
fn clones_share_one_pool() {
    let (addr, _) = start_coordinator(CoordinatorState::default());
    let handle = ClusterHandle::connect(test_config(&addr)).unwrap();
    let clone = handle.clone();

    handle.shutdown();
    assert!(clone.is_shut_down());
}

//! Connection pooling.
//!
//! The pool is a mutex-guarded idle list with a cap on total connections.
//! Callers borrow a connection for the duration of one call and return it
//! (or discard it after a transport failure, since the stream state is then
//! unknown). Closing the pool is idempotent.

use std::sync::Mutex;

use tracing::debug;

use crate::config::ClusterConfig;
use crate::connection::AdminConnection;
use crate::error::{ClusterError, ClusterResult};

pub(crate) struct ConnectionPool {
    state: Mutex<PoolState>,
    cap: usize,
}

struct PoolState {
    idle: Vec<AdminConnection>,
    in_use: usize,
    closed: bool,
}

impl ConnectionPool {
    pub(crate) fn new(cap: usize) -> Self {
        Self {
            state: Mutex::new(PoolState {
                idle: Vec::new(),
                in_use: 0,
                closed: false,
            }),
            cap: cap.max(1),
        }
    }

    /// Places an already-open connection into the pool.
    pub(crate) fn seed(&self, connection: AdminConnection) {
        let mut state = self.lock();
        if !state.closed {
            state.idle.push(connection);
        }
    }

    /// Borrows a connection, dialing a new one when the idle list is empty
    /// and the cap allows it.
    pub(crate) fn checkout(&self, config: &ClusterConfig) -> ClusterResult<AdminConnection> {
        {
            let mut state = self.lock();
            if state.closed {
                return Err(ClusterError::PoolClosed);
            }
            if let Some(connection) = state.idle.pop() {
                state.in_use += 1;
                return Ok(connection);
            }
            if state.in_use >= self.cap {
                return Err(ClusterError::PoolExhausted { cap: self.cap });
            }
            state.in_use += 1;
        }

        // Dial outside the lock; roll back the reservation on failure.
        match AdminConnection::open(config) {
            Ok(connection) => Ok(connection),
            Err(e) => {
                self.lock().in_use -= 1;
                Err(e)
            }
        }
    }

    /// Returns a healthy connection to the idle list.
    pub(crate) fn checkin(&self, connection: AdminConnection) {
        let mut state = self.lock();
        state.in_use -= 1;
        if !state.closed {
            state.idle.push(connection);
        }
    }

    /// Drops a connection whose stream state is no longer trustworthy.
    pub(crate) fn discard(&self, connection: AdminConnection) {
        let mut state = self.lock();
        state.in_use -= 1;
        drop(connection);
    }

    /// Closes the pool, dropping all idle connections.
    ///
    /// Returns `true` when this call performed the close; repeated calls
    /// return `false` and do nothing.
    pub(crate) fn close(&self) -> bool {
        let mut state = self.lock();
        if state.closed {
            return false;
        }
        state.closed = true;
        let dropped = state.idle.len();
        state.idle.clear();
        debug!(dropped, "connection pool closed");
        true
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.lock().closed
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, PoolState> {
        // A poisoned pool mutex means a panic mid-checkout; the pool state
        // is still structurally sound, so continue with it.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl std::fmt::Debug for ConnectionPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("ConnectionPool")
            .field("cap", &self.cap)
            .field("idle", &state.idle.len())
            .field("in_use", &state.in_use)
            .field("closed", &state.closed)
            .finish()
    }
}

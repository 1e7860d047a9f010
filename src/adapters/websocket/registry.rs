//! Session registry for the alert channel.
//!
//! Bookkeeping of which client connections are eligible for fan-out; this is
//! not a message queue. Each registered session owns one bounded frame
//! buffer; the distribution hub pushes into it, the connection handler
//! drains it onto the socket.
//!
//! # Thread Safety
//!
//! Connect/disconnect events from many clients race against each other, so
//! all mutation goes through one `RwLock` (single-writer discipline), while
//! `snapshot()` reads proceed concurrently with a consistent view.

use std::collections::HashMap;

use tokio::sync::{mpsc, RwLock};

use crate::domain::foundation::{Role, SessionId, Timestamp};

/// Lifecycle state of one registered session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Open,
    Closing,
    Closed,
}

/// One registered client connection.
#[derive(Debug)]
struct SessionRecord {
    role: Role,
    state: ConnectionState,
    last_seen_at: Timestamp,
    sender: mpsc::Sender<String>,
}

/// Fan-out view of one open session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    pub session_id: SessionId,
    pub sender: mpsc::Sender<String>,
}

/// Registry of live client sessions.
pub struct SessionRegistry {
    sessions: RwLock<HashMap<SessionId, SessionRecord>>,

    /// Frame buffer capacity handed to each new session.
    buffer_size: usize,
}

impl SessionRegistry {
    pub fn new(buffer_size: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            buffer_size,
        }
    }

    /// Create with default per-session buffer (64 frames).
    pub fn with_default_capacity() -> Self {
        Self::new(64)
    }

    /// Admits a new session in `Connecting` state.
    ///
    /// Returns the generated session id together with the receiving end of
    /// the session's frame buffer. Ids are random per connection attempt, so
    /// no two registrations collide.
    pub async fn register(&self, role: Role) -> (SessionId, mpsc::Receiver<String>) {
        let session_id = SessionId::new();
        let (tx, rx) = mpsc::channel(self.buffer_size);

        let record = SessionRecord {
            role,
            state: ConnectionState::Connecting,
            last_seen_at: Timestamp::now(),
            sender: tx,
        };
        self.sessions.write().await.insert(session_id, record);

        tracing::debug!(%session_id, %role, "session registered");
        (session_id, rx)
    }

    /// Transitions `Connecting -> Open` after a successful handshake.
    ///
    /// A no-op for unknown sessions (already evicted), logged rather than
    /// raised.
    pub async fn mark_open(&self, session_id: SessionId) {
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(&session_id) {
            Some(record) => {
                record.state = ConnectionState::Open;
                record.last_seen_at = Timestamp::now();
            }
            None => {
                tracing::debug!(%session_id, "mark_open for unknown session, ignoring");
            }
        }
    }

    /// Marks a session as draining after the client sent a close frame.
    pub async fn mark_closing(&self, session_id: SessionId) {
        if let Some(record) = self.sessions.write().await.get_mut(&session_id) {
            record.state = ConnectionState::Closing;
        }
    }

    /// Refreshes liveness on inbound client traffic.
    pub async fn touch(&self, session_id: SessionId) {
        if let Some(record) = self.sessions.write().await.get_mut(&session_id) {
            record.last_seen_at = Timestamp::now();
        }
    }

    /// Closes and removes a session.
    ///
    /// Idempotent: unregistering an unknown or already-removed session is a
    /// silent no-op, never an error.
    pub async fn unregister(&self, session_id: SessionId) {
        let removed = {
            let mut sessions = self.sessions.write().await;
            match sessions.remove(&session_id) {
                Some(mut record) => {
                    record.state = ConnectionState::Closed;
                    true
                }
                None => false,
            }
        };
        if removed {
            tracing::debug!(%session_id, "session unregistered");
        }
    }

    /// Read-only view of every session that is `Open` right now.
    ///
    /// Used by the distribution hub for fan-out; sessions still connecting
    /// or already draining are excluded.
    pub async fn snapshot(&self) -> Vec<SessionHandle> {
        self.sessions
            .read()
            .await
            .iter()
            .filter(|(_, record)| record.state == ConnectionState::Open)
            .map(|(id, record)| SessionHandle {
                session_id: *id,
                sender: record.sender.clone(),
            })
            .collect()
    }

    /// Current lifecycle state of a session, if registered.
    pub async fn state_of(&self, session_id: SessionId) -> Option<ConnectionState> {
        self.sessions
            .read()
            .await
            .get(&session_id)
            .map(|record| record.state)
    }

    /// Number of sessions currently `Open`.
    pub async fn open_count(&self) -> usize {
        self.sessions
            .read()
            .await
            .values()
            .filter(|record| record.state == ConnectionState::Open)
            .count()
    }

    /// Total registered sessions in any state.
    pub async fn total_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}

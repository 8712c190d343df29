//! Session record and lifecycle vocabulary
//!
//! A `Session` is one client connection as the registry sees it, from
//! admission to termination. The identity is assigned sequentially by the
//! registry and never reused within a process run.

use std::fmt;
use std::net::SocketAddr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identity of a session, e.g. `Client01`
///
/// Assigned by the registry at admission time; immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    /// Build the identity for the nth session ever admitted (1-based)
    pub(crate) fn from_sequence(n: usize) -> Self {
        Self(format!("Client{n:02}"))
    }

    /// The identity as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Why a session handler stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerminalReason {
    /// Client sent the `exit` command
    ClientExit,
    /// Peer closed the stream cleanly (zero-length read)
    ClosedByPeer,
    /// Peer vanished abruptly (connection reset / broken pipe)
    ConnectionReset,
    /// Unexpected failure while reading or processing
    InternalError,
}

impl fmt::Display for TerminalReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TerminalReason::ClientExit => "client exit",
            TerminalReason::ClosedByPeer => "closed by peer",
            TerminalReason::ConnectionReset => "connection reset",
            TerminalReason::InternalError => "internal error",
        };
        f.write_str(s)
    }
}

/// One connected or previously-connected client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Transport-level peer address
    pub remote_addr: SocketAddr,
    /// When the connection was admitted
    pub connected_at: DateTime<Utc>,
    /// When the session ended; `None` while live
    pub disconnected_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Create a live session record for a freshly admitted connection
    pub fn new(remote_addr: SocketAddr) -> Self {
        Self {
            remote_addr,
            connected_at: Utc::now(),
            disconnected_at: None,
        }
    }

    /// Whether the session is still connected
    pub fn is_live(&self) -> bool {
        self.disconnected_at.is_none()
    }

    /// Render the status-report body for this session
    ///
    /// Produces `Address: <addr>, Connected at: <ts>, Disconnected at: <ts>`
    /// with `Still connected` in place of the final timestamp while live.
    pub fn describe(&self) -> String {
        let disconnected = match self.disconnected_at {
            Some(ts) => format_timestamp(ts),
            None => "Still connected".to_string(),
        };
        format!(
            "Address: {}, Connected at: {}, Disconnected at: {}",
            self.remote_addr,
            format_timestamp(self.connected_at),
            disconnected
        )
    }
}

fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}

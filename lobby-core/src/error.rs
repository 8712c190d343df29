//! Error types for lobby-core

use thiserror::Error;

use crate::session::SessionId;

/// Errors from the session registry
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The identity is not present in the history registry
    #[error("unknown session: {0}")]
    UnknownSession(SessionId),

    /// The session was already finalized by an earlier disconnect
    #[error("session already disconnected: {0}")]
    AlreadyDisconnected(SessionId),
}

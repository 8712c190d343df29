//! Session registry: admission control and connection bookkeeping
//!
//! `SessionRegistry` owns two maps behind one mutex: the live registry
//! (currently connected sessions) and the history registry (every session
//! ever admitted, retained for the process lifetime). All mutation happens
//! inside `admit` and `record_disconnect`; callers never hold entries
//! across the lock.
//!
//! Admission is atomic: the capacity check, identity allocation, and
//! insertion into both maps are one critical section, so concurrent
//! connection attempts can neither overshoot `max_sessions` nor be handed
//! the same identity.

use std::collections::BTreeMap;
use std::net::SocketAddr;

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::RegistryError;
use crate::session::{Session, SessionId};

/// Outcome of an admission attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// Capacity remained; the session is registered under this identity
    Accepted(SessionId),
    /// The server is full; no session was created
    Rejected,
}

struct Registries {
    live: BTreeMap<SessionId, Session>,
    history: BTreeMap<SessionId, Session>,
}

/// Shared registry of live and historical sessions
pub struct SessionRegistry {
    max_sessions: usize,
    inner: Mutex<Registries>,
}

impl SessionRegistry {
    /// Create a registry admitting at most `max_sessions` concurrent sessions
    pub fn new(max_sessions: usize) -> Self {
        Self {
            max_sessions,
            inner: Mutex::new(Registries {
                live: BTreeMap::new(),
                history: BTreeMap::new(),
            }),
        }
    }

    /// The concurrent-session capacity
    pub fn max_sessions(&self) -> usize {
        self.max_sessions
    }

    /// Try to admit a connection from `remote_addr`
    ///
    /// Accepts iff the live registry is below capacity at the moment of the
    /// check. On acceptance the session is inserted into both registries
    /// before this method returns, under a single lock acquisition.
    /// Identities are `Client` plus a zero-padded counter derived from the
    /// history size, so they are dense and never reused.
    pub async fn admit(&self, remote_addr: SocketAddr) -> Admission {
        let mut inner = self.inner.lock().await;

        if inner.live.len() >= self.max_sessions {
            return Admission::Rejected;
        }

        let id = SessionId::from_sequence(inner.history.len() + 1);
        let session = Session::new(remote_addr);
        inner.live.insert(id.clone(), session.clone());
        inner.history.insert(id.clone(), session);

        debug!("admitted {id} ({} live)", inner.live.len());
        Admission::Accepted(id)
    }

    /// Finalize a session: stamp `disconnected_at` and drop it from the
    /// live registry
    ///
    /// The history entry is mutated in place, exactly once; a second call
    /// for the same identity returns `AlreadyDisconnected`.
    pub async fn record_disconnect(&self, id: &SessionId) -> Result<(), RegistryError> {
        let mut inner = self.inner.lock().await;

        let entry = inner
            .history
            .get_mut(id)
            .ok_or_else(|| RegistryError::UnknownSession(id.clone()))?;
        if entry.disconnected_at.is_some() {
            return Err(RegistryError::AlreadyDisconnected(id.clone()));
        }
        entry.disconnected_at = Some(Utc::now());
        inner.live.remove(id);

        debug!("finalized {id} ({} live)", inner.live.len());
        Ok(())
    }

    /// Clone the full history, one entry per session ever admitted
    ///
    /// Live sessions appear with `disconnected_at` unset. Ordered by
    /// identity, which matches admission order for the zero-padded labels.
    pub async fn snapshot(&self) -> Vec<(SessionId, Session)> {
        let inner = self.inner.lock().await;
        inner
            .history
            .iter()
            .map(|(id, session)| (id.clone(), session.clone()))
            .collect()
    }

    /// Number of currently connected sessions
    pub async fn live_count(&self) -> usize {
        self.inner.lock().await.live.len()
    }
}

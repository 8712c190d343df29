//! lobby-core - session registry and command parsing for the lobby server
//!
//! This crate owns the shared state of the system: the session registry
//! (live and historical connection records behind a single lock) and the
//! closed set of wire commands. The TCP plumbing lives in lobby-server.

pub mod command;
mod error;
pub mod registry;
pub mod session;

pub use command::Command;
pub use error::RegistryError;
pub use registry::{Admission, SessionRegistry};
pub use session::{Session, SessionId, TerminalReason};

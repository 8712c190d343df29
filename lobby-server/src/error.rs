//! Server error types

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while starting or running the lobby server
#[derive(Debug, Error)]
pub enum ServerError {
    /// Failed to bind to the specified address
    #[error("failed to bind to {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to create or open the file repository directory
    #[error("failed to open file repository at {path}: {source}")]
    Repository {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

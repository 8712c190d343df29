//! lobby-server - bounded-concurrency TCP session server
//!
//! The server accepts client connections up to a fixed capacity, tracks
//! each session in the shared registry from lobby-core, and runs one
//! handler task per connection for the line-oriented command protocol
//! (`status`, `list`, `print <name>`, `exit`, echo-with-ACK fallback).

mod dispatch;
mod error;
mod handler;
mod repository;

use std::path::PathBuf;
use std::sync::Arc;

use lobby_core::{Admission, SessionRegistry};
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tracing::{info, warn};

pub use error::ServerError;
pub use handler::MAX_REQUEST_BYTES;
pub use repository::FileRepository;

/// Line sent to a connection refused for capacity; clients key off the
/// `Server is full` substring
pub const REJECTION_MESSAGE: &str = "Server is full. Please try again later.";

/// Default concurrent-session capacity
pub const DEFAULT_MAX_SESSIONS: usize = 3;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Maximum number of concurrent sessions
    pub max_sessions: usize,
    /// Directory served by `list`/`print`; created at startup if absent
    pub repository: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            max_sessions: DEFAULT_MAX_SESSIONS,
            repository: PathBuf::from("file_repository"),
        }
    }
}

impl ServerConfig {
    /// Create a config with the specified host and port
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    /// Returns the socket address string (e.g., "0.0.0.0:8080")
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// The lobby server: accept loop plus shared session registry
pub struct LobbyServer {
    config: ServerConfig,
    registry: Arc<SessionRegistry>,
}

impl LobbyServer {
    /// Create a new server with a fresh registry sized from the config
    pub fn new(config: ServerConfig) -> Self {
        let registry = Arc::new(SessionRegistry::new(config.max_sessions));
        Self { config, registry }
    }

    /// Create a server around an existing registry (for testing)
    pub fn with_registry(config: ServerConfig, registry: Arc<SessionRegistry>) -> Self {
        Self { config, registry }
    }

    /// Get the server configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Get the shared session registry
    pub fn registry(&self) -> Arc<SessionRegistry> {
        Arc::clone(&self.registry)
    }

    /// Run the server, binding to the configured address
    pub async fn run(self) -> Result<(), ServerError> {
        let addr = self.config.addr();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| ServerError::Bind {
                addr: addr.clone(),
                source: e,
            })?;

        info!("lobby server listening on {addr}");
        self.run_with_listener(listener).await
    }

    /// Run the accept loop on an already-bound listener
    ///
    /// Admission happens here: the capacity check and registry insert are
    /// one critical section inside `admit`. The loop itself never writes
    /// to clients — welcome and rejection lines go out on spawned tasks,
    /// so one slow client cannot stall acceptance.
    pub async fn run_with_listener(self, listener: TcpListener) -> Result<(), ServerError> {
        let repository = FileRepository::open(&self.config.repository)
            .await
            .map_err(|e| ServerError::Repository {
                path: self.config.repository.clone(),
                source: e,
            })?;
        let repository = Arc::new(repository);

        loop {
            let (stream, peer) = match listener.accept().await {
                Ok(conn) => conn,
                Err(e) => {
                    warn!("accept failed: {e}");
                    continue;
                }
            };

            match self.registry.admit(peer).await {
                Admission::Accepted(id) => {
                    info!("{id} connected from {peer}");
                    tokio::spawn(handler::run_session(
                        stream,
                        id,
                        Arc::clone(&self.registry),
                        Arc::clone(&repository),
                    ));
                }
                Admission::Rejected => {
                    warn!("server full, rejecting connection from {peer}");
                    tokio::spawn(reject(stream));
                }
            }
        }
    }
}

/// Send the rejection line and drop the connection
async fn reject(mut stream: TcpStream) {
    if let Err(e) = stream.write_all(REJECTION_MESSAGE.as_bytes()).await {
        warn!("failed to send rejection: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_config_default() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.max_sessions, DEFAULT_MAX_SESSIONS);
    }

    #[test]
    fn server_config_addr() {
        let config = ServerConfig::new("127.0.0.1", 9090);
        assert_eq!(config.addr(), "127.0.0.1:9090");
    }

    #[test]
    fn server_new_sizes_registry_from_config() {
        let config = ServerConfig {
            max_sessions: 5,
            ..ServerConfig::default()
        };
        let server = LobbyServer::new(config);
        assert_eq!(server.registry().max_sessions(), 5);
    }

    #[test]
    fn server_with_registry_shares_the_instance() {
        let registry = Arc::new(SessionRegistry::new(2));
        let server = LobbyServer::with_registry(ServerConfig::default(), Arc::clone(&registry));
        assert!(Arc::ptr_eq(&registry, &server.registry()));
    }
}

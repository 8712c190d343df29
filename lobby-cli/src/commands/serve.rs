//! Serve command: run the lobby server in the foreground

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use lobby_server::{DEFAULT_MAX_SESSIONS, LobbyServer, ServerConfig};
use tracing::info;

/// Default port for the lobby server
pub const DEFAULT_PORT: u16 = 8080;
/// Default host for the lobby server
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Arguments for the serve command
#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Host to bind to
    #[arg(long, default_value = DEFAULT_HOST)]
    pub host: String,

    /// Maximum number of concurrent clients
    #[arg(short, long, default_value_t = DEFAULT_MAX_SESSIONS)]
    pub max_clients: usize,

    /// Directory served by list/print, created if absent
    #[arg(long, default_value = "file_repository")]
    pub repository: PathBuf,
}

/// Run the serve command
pub async fn run(args: ServeArgs) -> Result<()> {
    let config = ServerConfig {
        host: args.host,
        port: args.port,
        max_sessions: args.max_clients,
        repository: args.repository,
    };

    info!(
        "starting lobby server on {} (capacity {})",
        config.addr(),
        config.max_sessions
    );

    LobbyServer::new(config).run().await?;
    Ok(())
}

//! Per-connection session handler
//!
//! One tokio task per admitted connection: greet, then block on reads,
//! dispatch each request, write the response, until a terminal condition.
//! Whatever ends the loop, cleanup runs exactly once through the single
//! exit path in `run_session`.

use std::io;
use std::sync::Arc;

use lobby_core::{Command, SessionId, SessionRegistry, TerminalReason};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::{debug, error, info, warn};

use crate::dispatch;
use crate::repository::FileRepository;

/// Largest request frame the server reads in one chunk
pub const MAX_REQUEST_BYTES: usize = 1024;

/// Drive one admitted connection to completion, then deregister it
///
/// The registry entry was inserted by `admit` before this task was
/// spawned; the welcome line is the first thing written on the stream.
pub(crate) async fn run_session(
    mut stream: TcpStream,
    id: SessionId,
    registry: Arc<SessionRegistry>,
    repository: Arc<FileRepository>,
) {
    let reason = serve(&mut stream, &id, &registry, &repository).await;

    match reason {
        TerminalReason::ClientExit | TerminalReason::ClosedByPeer => {
            info!("{id} disconnected ({reason})");
        }
        TerminalReason::ConnectionReset => {
            warn!("{id} forcibly disconnected");
        }
        TerminalReason::InternalError => {
            error!("{id} terminated after internal error");
        }
    }

    if let Err(e) = registry.record_disconnect(&id).await {
        warn!("failed to deregister {id}: {e}");
    }
    // Stream closes when dropped here.
}

/// The receive/dispatch/send loop; returns why the session ended
async fn serve(
    stream: &mut TcpStream,
    id: &SessionId,
    registry: &SessionRegistry,
    repository: &FileRepository,
) -> TerminalReason {
    let welcome = format!("Welcome to the server {id}");
    if let Err(e) = stream.write_all(welcome.as_bytes()).await {
        return classify_io_error(id, "welcome write", e);
    }

    let mut buf = [0u8; MAX_REQUEST_BYTES];
    loop {
        let n = match stream.read(&mut buf).await {
            Ok(0) => return TerminalReason::ClosedByPeer,
            Ok(n) => n,
            Err(e) => return classify_io_error(id, "read", e),
        };

        let text = String::from_utf8_lossy(&buf[..n]).into_owned();
        debug!("{id} sent: {text}");

        let command = Command::parse(&text);
        if command == Command::Exit {
            return TerminalReason::ClientExit;
        }

        let response = match dispatch::respond(&command, registry, repository).await {
            Ok(response) => response,
            Err(e) => {
                error!("error handling {id}: {e}");
                return TerminalReason::InternalError;
            }
        };

        if let Err(e) = stream.write_all(response.as_bytes()).await {
            return classify_io_error(id, "response write", e);
        }
    }
}

/// Map a transport error onto a terminal reason
///
/// An abrupt peer teardown shows up as reset/aborted/broken-pipe; anything
/// else is unexpected and logged as such.
fn classify_io_error(id: &SessionId, context: &str, e: io::Error) -> TerminalReason {
    match e.kind() {
        io::ErrorKind::ConnectionReset
        | io::ErrorKind::ConnectionAborted
        | io::ErrorKind::BrokenPipe => TerminalReason::ConnectionReset,
        _ => {
            error!("error handling {id} during {context}: {e}");
            TerminalReason::InternalError
        }
    }
}

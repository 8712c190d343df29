//! Command dispatch: parsed command in, response text out
//!
//! Dispatch holds no state of its own; `status` takes a snapshot under the
//! registry lock, `list`/`print` consult the file repository, everything
//! else is a pure echo. `exit` never reaches here — the session handler
//! terminates on it before dispatching.

use std::io;

use lobby_core::{Command, SessionRegistry};

use crate::repository::FileRepository;

/// Produce the response for a non-exit command
///
/// An `Err` here is an unexpected collaborator failure (repository I/O);
/// the handler treats it as an internal error and terminates the session.
/// Missing files are a normal response, not an error.
pub(crate) async fn respond(
    command: &Command,
    registry: &SessionRegistry,
    repository: &FileRepository,
) -> io::Result<String> {
    match command {
        Command::Exit => unreachable!("exit is handled by the session loop"),
        Command::Status => Ok(status_report(registry).await),
        Command::List => {
            let names = repository.list().await?;
            Ok(format!("Available files:\n{}", names.join("\n")))
        }
        Command::Print(name) => match repository.read(name).await? {
            Some(content) => Ok(format!("Contents of {name}:\n{content}")),
            None => Ok(format!("No such file: {name}")),
        },
        Command::Echo(text) => Ok(format!("{text} ACK")),
    }
}

/// Render the connection history, one line per session ever admitted
async fn status_report(registry: &SessionRegistry) -> String {
    let mut report = String::from("Connected clients history:\n");
    for (id, session) in registry.snapshot().await {
        report.push_str(&format!("{id}: {}\n", session.describe()));
    }
    report
}

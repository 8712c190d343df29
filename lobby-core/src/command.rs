//! Wire command vocabulary
//!
//! Requests are raw text chunks; parsing maps each chunk onto a closed set
//! of variants. `exit`, `status`, and `list` match the whole text, ASCII
//! case-insensitively. `print ` matches as a case-insensitive prefix and
//! the remainder is taken verbatim, untrimmed. Everything else is echoed
//! back with an ` ACK` suffix.

use serde::{Deserialize, Serialize};

const PRINT_PREFIX: &str = "print ";

/// A parsed client request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Terminate the session; no response is sent
    Exit,
    /// Report the full connection history
    Status,
    /// List files in the repository
    List,
    /// Send the contents of the named file; the name is the request text
    /// after `print `, whitespace and all
    Print(String),
    /// Anything unrecognized: acknowledge by echoing the text
    Echo(String),
}

impl Command {
    /// Parse a request chunk into a command
    pub fn parse(input: &str) -> Command {
        if input.eq_ignore_ascii_case("exit") {
            return Command::Exit;
        }
        if input.eq_ignore_ascii_case("status") {
            return Command::Status;
        }
        if input.eq_ignore_ascii_case("list") {
            return Command::List;
        }
        if let Some(prefix) = input.get(..PRINT_PREFIX.len()) {
            if prefix.eq_ignore_ascii_case(PRINT_PREFIX) {
                return Command::Print(input[PRINT_PREFIX.len()..].to_string());
            }
        }
        Command::Echo(input.to_string())
    }
}

//! Connect command: interactive client for a running lobby server
//!
//! Reads the greeting first; a line containing `Server is full` is a
//! terminal rejection. Otherwise prompts on stdin, sends each line as one
//! request chunk, and prints the response, until `exit` or the server
//! hangs up.

use anyhow::{Context, Result};
use clap::Args;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

/// Largest response chunk the client reads at once
const MAX_RESPONSE_BYTES: usize = 4096;

/// Arguments for the connect command
#[derive(Debug, Args)]
pub struct ConnectArgs {
    /// Server host
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Server port
    #[arg(short, long, default_value_t = 8080)]
    pub port: u16,
}

/// Run the connect command
pub async fn run(args: ConnectArgs) -> Result<()> {
    let addr = format!("{}:{}", args.host, args.port);
    let mut stream = TcpStream::connect(&addr)
        .await
        .with_context(|| format!("unable to connect to {addr}; is the server running?"))?;

    let greeting = recv(&mut stream).await?;
    println!("{greeting}");

    if greeting.contains("Server is full") {
        println!("The server is currently full. Please try again later.");
        return Ok(());
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        println!(
            "Send a message ('exit' to quit, 'status' for connected clients, \
             'list' for files, 'print <filename>' for file contents):"
        );
        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.is_empty() {
            continue;
        }

        stream.write_all(line.as_bytes()).await?;
        if line.eq_ignore_ascii_case("exit") {
            break;
        }

        let response = recv(&mut stream).await?;
        if response.is_empty() {
            println!("Server closed the connection.");
            break;
        }
        println!("Server response: {response}");
    }

    println!("Disconnected from the server.");
    Ok(())
}

/// Read one chunk from the server; empty string means the peer closed
async fn recv(stream: &mut TcpStream) -> Result<String> {
    let mut buf = [0u8; MAX_RESPONSE_BYTES];
    let n = stream.read(&mut buf).await?;
    Ok(String::from_utf8_lossy(&buf[..n]).into_owned())
}

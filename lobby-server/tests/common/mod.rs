//! Shared test utilities for lobby-server integration tests

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use lobby_core::SessionRegistry;
use lobby_server::{LobbyServer, ServerConfig};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// A server running on an ephemeral port with its own repository directory
#[allow(dead_code)]
pub struct TestServer {
    pub addr: SocketAddr,
    pub registry: Arc<SessionRegistry>,
    pub repository: tempfile::TempDir,
}

/// Spawn a server with the given capacity, return its address and registry
#[allow(dead_code)]
pub async fn start_server(max_sessions: usize) -> TestServer {
    let repository = tempfile::tempdir().unwrap();
    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        max_sessions,
        repository: repository.path().to_path_buf(),
    };

    let registry = Arc::new(SessionRegistry::new(max_sessions));
    let server = LobbyServer::with_registry(config, Arc::clone(&registry));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let _ = server.run_with_listener(listener).await;
    });

    // Brief delay so the accept loop is up before clients connect
    tokio::time::sleep(Duration::from_millis(10)).await;

    TestServer {
        addr,
        registry,
        repository,
    }
}

/// Minimal blocking-style client for the raw-chunk protocol
pub struct TestClient {
    stream: TcpStream,
}

#[allow(dead_code)]
impl TestClient {
    /// Connect and read the server's greeting (welcome or rejection)
    pub async fn connect(addr: SocketAddr) -> (Self, String) {
        let stream = TcpStream::connect(addr).await.unwrap();
        let mut client = Self { stream };
        let greeting = client.recv().await;
        (client, greeting)
    }

    /// Send one request chunk
    pub async fn send(&mut self, text: &str) {
        self.stream.write_all(text.as_bytes()).await.unwrap();
    }

    /// Read one response chunk; panics if nothing arrives in time
    pub async fn recv(&mut self) -> String {
        let mut buf = [0u8; 4096];
        let n = tokio::time::timeout(Duration::from_secs(5), self.stream.read(&mut buf))
            .await
            .expect("timed out waiting for response")
            .unwrap();
        String::from_utf8_lossy(&buf[..n]).into_owned()
    }

    /// Send a request and read the response
    pub async fn request(&mut self, text: &str) -> String {
        self.send(text).await;
        self.recv().await
    }

    /// Read until the peer closes; asserts no further data arrived
    pub async fn expect_closed(&mut self) {
        let mut buf = [0u8; 4096];
        let n = tokio::time::timeout(Duration::from_secs(5), self.stream.read(&mut buf))
            .await
            .expect("timed out waiting for close")
            .unwrap();
        assert_eq!(n, 0, "expected the connection to close without data");
    }
}

/// Poll until the registry's live count reaches `expected`
#[allow(dead_code)]
pub async fn wait_for_live_count(registry: &SessionRegistry, expected: usize) {
    for _ in 0..100 {
        if registry.live_count().await == expected {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!(
        "live count never reached {expected}, still {}",
        registry.live_count().await
    );
}

//! Admission control: capacity enforcement over real connections

mod common;

use common::{TestClient, start_server, wait_for_live_count};

#[tokio::test]
async fn first_client_is_welcomed_with_its_identity() {
    let server = start_server(1).await;
    let (_client, greeting) = TestClient::connect(server.addr).await;
    assert_eq!(greeting, "Welcome to the server Client01");
}

#[tokio::test]
async fn second_client_beyond_capacity_is_rejected_and_closed() {
    let server = start_server(1).await;
    let (_first, greeting) = TestClient::connect(server.addr).await;
    assert!(greeting.contains("Client01"));

    let (mut second, rejection) = TestClient::connect(server.addr).await;
    assert!(rejection.contains("Server is full"));
    second.expect_closed().await;

    // Rejection creates no session
    assert_eq!(server.registry.snapshot().await.len(), 1);
}

#[tokio::test]
async fn abrupt_disconnect_frees_the_slot() {
    let server = start_server(1).await;
    let (first, greeting) = TestClient::connect(server.addr).await;
    assert!(greeting.contains("Client01"));

    // Drop without sending exit
    drop(first);
    wait_for_live_count(&server.registry, 0).await;

    let (_second, greeting) = TestClient::connect(server.addr).await;
    assert_eq!(greeting, "Welcome to the server Client02");

    // The first session is finalized in history, not forgotten
    let snapshot = server.registry.snapshot().await;
    assert_eq!(snapshot.len(), 2);
    assert!(snapshot[0].1.disconnected_at.is_some());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn live_sessions_never_exceed_capacity_under_contention() {
    let server = start_server(2).await;

    let mut handles = Vec::new();
    for _ in 0..8 {
        let addr = server.addr;
        handles.push(tokio::spawn(async move {
            let (client, greeting) = TestClient::connect(addr).await;
            // Hold accepted connections open for the duration of the test
            if greeting.contains("Welcome") {
                Some(client)
            } else {
                None
            }
        }));
    }

    let mut held = Vec::new();
    let mut welcomed = 0;
    for handle in handles {
        if let Some(client) = handle.await.unwrap() {
            welcomed += 1;
            held.push(client);
        }
    }

    assert_eq!(welcomed, 2);
    assert_eq!(server.registry.live_count().await, 2);
}

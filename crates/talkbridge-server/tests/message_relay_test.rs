//! Message relay: translate-then-broadcast end to end.

mod common;

use common::{assert_no_frame, connect_ws, join_room, recv_frame, spawn_app, stub_providers};
use serde_json::json;
use std::time::Duration;

#[tokio::test]
async fn message_is_broadcast_to_every_room_subscriber() {
    let stub = stub_providers("Chào bạn", "").await;
    let (addr, _state) = spawn_app(format!("http://{}", stub)).await;

    let mut client_a = connect_ws(addr, "A1").await;
    let mut client_b = connect_ws(addr, "B1").await;
    join_room(&mut client_a, "ABC123").await;
    join_room(&mut client_b, "ABC123").await;
    tokio::time::sleep(Duration::from_millis(100)).await;

    let response = reqwest::Client::new()
        .post(format!("http://{}/message", addr))
        .json(&json!({
            "roomCode": "ABC123",
            "text": "Hi",
            "fromLang": "en",
            "sender": "A1"
        }))
        .send()
        .await
        .unwrap();

    assert!(response.status().is_success());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);

    // Both subscribers — including the sender — observe the broadcast.
    for ws in [&mut client_a, &mut client_b] {
        let frame = recv_frame(ws).await;
        assert_eq!(frame["channel"], "room-ABC123");
        assert_eq!(frame["event"], "new-message");
        assert_eq!(frame["data"]["text"], "Hi");
        assert_eq!(frame["data"]["translated"], "Chào bạn");
        assert_eq!(frame["data"]["fromLang"], "en");
        assert_eq!(frame["data"]["sender"], "A1");
        assert!(!frame["data"]["id"].as_str().unwrap().is_empty());
    }
}

#[tokio::test]
async fn message_does_not_leak_into_other_rooms() {
    let stub = stub_providers("Chào", "").await;
    let (addr, _state) = spawn_app(format!("http://{}", stub)).await;

    let mut bystander = connect_ws(addr, "C1").await;
    join_room(&mut bystander, "OTHER").await;
    tokio::time::sleep(Duration::from_millis(100)).await;

    reqwest::Client::new()
        .post(format!("http://{}/message", addr))
        .json(&json!({
            "roomCode": "ABC123",
            "text": "Hi",
            "fromLang": "en",
            "sender": "A1"
        }))
        .send()
        .await
        .unwrap();

    assert_no_frame(&mut bystander).await;
}

#[tokio::test]
async fn empty_room_code_is_rejected_without_translation() {
    let (addr, _state) = spawn_app("http://127.0.0.1:1".to_string()).await;

    let response = reqwest::Client::new()
        .post(format!("http://{}/message", addr))
        .json(&json!({
            "roomCode": "",
            "text": "Hi",
            "fromLang": "en",
            "sender": "A1"
        }))
        .send()
        .await
        .unwrap();

    // 400 from validation, not 500 from the unreachable provider: the
    // relay never called upstream.
    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn failed_translation_broadcasts_nothing() {
    let (addr, _state) = spawn_app("http://127.0.0.1:1".to_string()).await;

    let mut subscriber = connect_ws(addr, "B1").await;
    join_room(&mut subscriber, "R1").await;
    tokio::time::sleep(Duration::from_millis(100)).await;

    let response = reqwest::Client::new()
        .post(format!("http://{}/message", addr))
        .json(&json!({
            "roomCode": "R1",
            "text": "Hi",
            "fromLang": "vi",
            "sender": "A1"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 500);
    assert_no_frame(&mut subscriber).await;
}

//! Shared helpers for server integration tests.
//!
//! Tests run the real router on an ephemeral port with the pipeline
//! clients pointed at a stubbed provider server.

#![allow(dead_code)]

use axum::routing::post;
use axum::{Json, Router};
use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use talkbridge_pipeline::{
    Synthesizer, SynthesizerConfig, Transcriber, TranscriberConfig, Translator, TranslatorConfig,
    VoiceMap,
};
use talkbridge_rooms::RoomHub;
use talkbridge_server::{app, AppState};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::protocol::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

pub type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Serves a router on an ephemeral port and returns its address.
pub async fn serve(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

/// A stub provider server answering all three hosted APIs with canned
/// responses.
pub async fn stub_providers(translated: &'static str, transcript: &'static str) -> SocketAddr {
    let router = Router::new()
        .route(
            "/chat/completions",
            post(move || async move {
                Json(json!({
                    "choices": [ { "message": { "content": translated } } ]
                }))
            }),
        )
        .route(
            "/audio/transcriptions",
            post(move || async move { Json(json!({ "text": transcript })) }),
        )
        .route(
            "/text-to-speech/{voice}",
            post(|| async { b"stub-mpeg-audio".to_vec() }),
        );
    serve(router).await
}

/// Builds the application against the given provider base URL and
/// serves it. Returns the address and the state for hub inspection.
pub async fn spawn_app(provider_base: String) -> (SocketAddr, AppState) {
    let state = AppState {
        hub: RoomHub::new(),
        translator: Arc::new(Translator::new(TranslatorConfig {
            base_url: provider_base.clone(),
            api_key: "test-key".to_string(),
            ..Default::default()
        })),
        transcriber: Arc::new(Transcriber::new(TranscriberConfig {
            base_url: provider_base.clone(),
            api_key: "test-key".to_string(),
            realtime_token: "realtime-secret".to_string(),
            ..Default::default()
        })),
        synthesizer: Arc::new(Synthesizer::new(SynthesizerConfig {
            base_url: provider_base,
            api_key: "test-key".to_string(),
            voices: VoiceMap {
                male_en: "voice-m-en".to_string(),
                female_en: "voice-f-en".to_string(),
                male_vi: "voice-m-vi".to_string(),
                female_vi: "voice-f-vi".to_string(),
            },
            ..Default::default()
        })),
    };

    let addr = serve(app(state.clone())).await;
    (addr, state)
}

/// Connects a WebSocket client as the given participant.
pub async fn connect_ws(addr: SocketAddr, participant: &str) -> WsClient {
    let url = format!("ws://{}/ws?participant={}", addr, participant);
    let (stream, _) = connect_async(url).await.expect("failed to connect ws");
    stream
}

/// Sends a `join` frame for a room.
pub async fn join_room(ws: &mut WsClient, room_code: &str) {
    let frame = json!({ "type": "join", "roomCode": room_code });
    ws.send(Message::Text(frame.to_string().into()))
        .await
        .expect("failed to send join frame");
}

/// Receives the next text frame as JSON, panicking after a timeout.
pub async fn recv_frame(ws: &mut WsClient) -> serde_json::Value {
    let msg = tokio::time::timeout(Duration::from_secs(5), ws.next())
        .await
        .expect("timed out waiting for frame")
        .expect("stream ended")
        .expect("ws error");
    match msg {
        Message::Text(text) => serde_json::from_str(text.as_str()).expect("invalid frame json"),
        other => panic!("unexpected ws message: {:?}", other),
    }
}

/// Asserts that no frame arrives within a short window.
pub async fn assert_no_frame(ws: &mut WsClient) {
    let result = tokio::time::timeout(Duration::from_millis(300), ws.next()).await;
    if let Ok(Some(Ok(Message::Text(text)))) = result {
        panic!("unexpected frame: {}", text);
    }
}

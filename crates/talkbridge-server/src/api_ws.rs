//! WebSocket subscription surface.
//!
//! Clients connect with their participant id, then drive their session
//! with JSON frames (`join`, `leave`, `recording`, `call`). Room
//! broadcasts are delivered as `{channel, event, data}` frames on the
//! same socket. Protocol errors produce an `error` frame and leave the
//! connection open.

use crate::AppState;
use axum::{
    extract::{
        ws::{Message as AxumMessage, WebSocket},
        Extension, Query, WebSocketUpgrade,
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use std::sync::Arc;
use talkbridge_rooms::RoomSession;
use tokio::sync::mpsc;

/// Query parameters for the WebSocket connection.
#[derive(Debug, Deserialize)]
pub struct WsConnectParams {
    /// Client-generated participant id. Distinguishes "my messages"
    /// from others' and keys client-side signal echo suppression.
    pub participant: Option<String>,
}

/// Incoming WebSocket frame types.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum IncomingFrame {
    Join {
        #[serde(rename = "roomCode")]
        room_code: String,
    },
    Leave,
    Recording { active: bool },
    Call { active: bool },
}

/// Sends an `error` frame over the session's outbound channel.
fn send_error(tx: &mpsc::Sender<String>, message: String) {
    let frame = serde_json::json!({
        "event": "error",
        "data": { "message": message }
    });
    if let Err(e) = tx.try_send(frame.to_string()) {
        tracing::warn!("failed to send WebSocket error to client: {}", e);
    }
}

/// WebSocket handler: `GET /ws?participant=...`.
pub async fn ws_handler(
    Extension(state): Extension<Arc<AppState>>,
    ws: WebSocketUpgrade,
    Query(params): Query<WsConnectParams>,
) -> impl IntoResponse {
    let participant = match params.participant.filter(|p| !p.is_empty()) {
        Some(p) => p,
        None => {
            tracing::warn!("websocket connect missing participant id");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    ws.on_upgrade(move |socket| handle_socket(socket, state, participant))
}

/// Handles the WebSocket connection.
async fn handle_socket(socket: WebSocket, state: Arc<AppState>, participant: String) {
    let (mut sender, mut receiver) = socket.split();

    // Bounded channel so a slow consumer drops frames instead of
    // growing memory without limit.
    let (tx, mut rx) = mpsc::channel::<String>(256);

    let mut session = RoomSession::connect(state.hub.clone(), participant.clone(), tx.clone()).await;
    tracing::info!(participant = %participant, "websocket connected");

    // Forward broadcast frames from the hub to the socket.
    let send_task = tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if sender.send(AxumMessage::Text(frame.into())).await.is_err() {
                break;
            }
        }
    });

    while let Some(Ok(msg)) = receiver.next().await {
        match msg {
            AxumMessage::Text(text) => {
                match serde_json::from_str::<IncomingFrame>(text.as_str()) {
                    Ok(frame) => {
                        let result = match frame {
                            IncomingFrame::Join { room_code } => session.join(&room_code).await,
                            IncomingFrame::Leave => {
                                session.leave().await;
                                Ok(())
                            }
                            IncomingFrame::Recording { active: true } => session.start_recording(),
                            IncomingFrame::Recording { active: false } => session.stop_recording(),
                            IncomingFrame::Call { active: true } => session.start_call(),
                            IncomingFrame::Call { active: false } => session.end_call(),
                        };
                        if let Err(e) = result {
                            send_error(&tx, e.to_string());
                        }
                    }
                    Err(_) => {
                        tracing::warn!(
                            participant = %participant,
                            "failed to parse incoming WebSocket frame"
                        );
                        send_error(&tx, "invalid frame format".to_string());
                    }
                }
            }
            AxumMessage::Close(_) => break,
            _ => {}
        }
    }

    // Connection teardown releases the subscription and registration.
    session.close().await;
    send_task.abort();
    tracing::info!(participant = %participant, "websocket disconnected");
}

//! WebRTC signaling relay.
//!
//! A dumb forwarding relay: envelopes are broadcast verbatim, with no
//! inspection or validation of `type` or `payload`. Receivers drop
//! envelopes carrying their own sender id client-side.

use crate::api::ApiError;
use crate::AppState;
use axum::extract::{Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use talkbridge_types::{RoomEvent, SignalEnvelope};

/// Request body for `POST /signal`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalRequest {
    pub room_code: String,
    pub sender: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub payload: serde_json::Value,
}

/// Handler for `POST /signal`.
pub async fn signal_relay_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<SignalRequest>,
) -> Result<Json<Value>, ApiError> {
    if payload.room_code.is_empty() {
        return Err(ApiError::BadRequest("roomCode must not be empty".to_string()));
    }

    tracing::debug!(
        room = %payload.room_code,
        sender = %payload.sender,
        kind = %payload.kind,
        "relaying webrtc signal"
    );
    state
        .hub
        .publish(
            &payload.room_code,
            &RoomEvent::WebrtcSignal(SignalEnvelope {
                sender: payload.sender,
                kind: payload.kind,
                payload: payload.payload,
            }),
        )
        .await;

    Ok(Json(json!({ "success": true })))
}

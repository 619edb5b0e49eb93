//! Text message relay: translate, then broadcast to the room.

use crate::api::ApiError;
use crate::AppState;
use axum::extract::{Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use talkbridge_types::{message_id, ChatMessage, Language, RoomEvent};

/// Request body for `POST /message`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRequest {
    pub room_code: String,
    pub text: String,
    pub from_lang: Language,
    pub sender: String,
}

/// Handler for `POST /message`.
///
/// Translates the text into the complement language, then broadcasts a
/// `new-message` event to the room. The translation is delivered only
/// through the broadcast — the sender receives its own message via the
/// subscription it used to join the room. On any failure nothing is
/// broadcast.
pub async fn message_relay_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<MessageRequest>,
) -> Result<Json<Value>, ApiError> {
    if payload.room_code.is_empty() {
        return Err(ApiError::BadRequest("roomCode must not be empty".to_string()));
    }

    let translated = state
        .translator
        .translate(&payload.text, payload.from_lang)
        .await?;

    let message = ChatMessage {
        id: message_id(),
        text: payload.text,
        translated,
        from_lang: payload.from_lang,
        sender: payload.sender,
        audio_url: None,
    };

    tracing::info!(
        room = %payload.room_code,
        message_id = %message.id,
        from = %message.from_lang,
        "relaying chat message"
    );
    state
        .hub
        .publish(&payload.room_code, &RoomEvent::NewMessage(message))
        .await;

    Ok(Json(json!({ "success": true })))
}

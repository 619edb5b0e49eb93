//! Voice message relay: transcribe → translate → synthesize → broadcast.
//!
//! A strict three-stage sequential pipeline. Each stage is a hard
//! dependency on the previous succeeding; any failure aborts the whole
//! operation with no partial broadcast and no retry — a transient
//! failure loses the transcript and the user must re-record.

use crate::api::ApiError;
use crate::AppState;
use axum::extract::{Extension, Json, Multipart};
use serde_json::{json, Value};
use std::sync::Arc;
use talkbridge_types::{message_id, ChatMessage, Language, RoomEvent, VoicePreference};

/// Fields extracted from the `POST /voice` multipart form.
struct VoiceForm {
    audio: Vec<u8>,
    content_type: String,
    room_code: String,
    from_lang: Language,
    sender: String,
    gender: VoicePreference,
}

async fn read_form(mut multipart: Multipart) -> Result<VoiceForm, ApiError> {
    let mut audio: Option<(Vec<u8>, String)> = None;
    let mut room_code: Option<String> = None;
    let mut from_lang: Option<Language> = None;
    let mut sender: Option<String> = None;
    let mut gender = VoicePreference::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("multipart error: {}", e)))?
    {
        match field.name() {
            Some("audio") => {
                let content_type = field
                    .content_type()
                    .unwrap_or("audio/webm")
                    .to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("multipart error: {}", e)))?;
                audio = Some((data.to_vec(), content_type));
            }
            Some("roomCode") => {
                room_code = Some(text_field(field).await?);
            }
            Some("fromLang") => {
                let value = text_field(field).await?;
                from_lang = Some(
                    value
                        .parse::<Language>()
                        .map_err(|e| ApiError::BadRequest(e.to_string()))?,
                );
            }
            Some("sender") => {
                sender = Some(text_field(field).await?);
            }
            Some("gender") => {
                gender = VoicePreference::from_param(&text_field(field).await?);
            }
            _ => {}
        }
    }

    let (audio, content_type) =
        audio.ok_or_else(|| ApiError::BadRequest("no audio provided".to_string()))?;
    if audio.is_empty() {
        return Err(ApiError::BadRequest("no audio provided".to_string()));
    }
    let room_code = room_code
        .filter(|code| !code.is_empty())
        .ok_or_else(|| ApiError::BadRequest("no room code provided".to_string()))?;
    let from_lang =
        from_lang.ok_or_else(|| ApiError::BadRequest("no source language provided".to_string()))?;
    let sender = sender.ok_or_else(|| ApiError::BadRequest("no sender provided".to_string()))?;

    Ok(VoiceForm {
        audio,
        content_type,
        room_code,
        from_lang,
        sender,
        gender,
    })
}

async fn text_field(field: axum::extract::multipart::Field<'_>) -> Result<String, ApiError> {
    field
        .text()
        .await
        .map_err(|e| ApiError::BadRequest(format!("multipart error: {}", e)))
}

/// Handler for `POST /voice` (multipart: `audio`, `roomCode`,
/// `fromLang`, `sender`, `gender`).
pub async fn voice_relay_handler(
    Extension(state): Extension<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    let form = read_form(multipart).await?;

    // 1. Speech to text. Blank output short-circuits as
    //    400 "No speech detected" before anything is broadcast.
    let text = state
        .transcriber
        .transcribe(form.audio, &form.content_type)
        .await?;

    // 2. Translate into the complement language.
    let translated = state.translator.translate(&text, form.from_lang).await?;

    // 3. Synthesize the translation with the voice matching the
    //    preference and target language.
    let target = form.from_lang.complement();
    let voice = state.synthesizer.voice_for(form.gender, target).to_string();
    let audio_url = state
        .synthesizer
        .synthesize_data_uri(&translated, &voice)
        .await?;

    // 4. Broadcast.
    let message = ChatMessage {
        id: message_id(),
        text,
        translated,
        from_lang: form.from_lang,
        sender: form.sender,
        audio_url: Some(audio_url),
    };

    tracing::info!(
        room = %form.room_code,
        message_id = %message.id,
        from = %message.from_lang,
        "relaying voice message"
    );
    state
        .hub
        .publish(&form.room_code, &RoomEvent::NewMessage(message))
        .await;

    Ok(Json(json!({ "success": true })))
}

//! Shared API error type and the standalone translate/tts/token handlers.

use crate::AppState;
use axum::{
    extract::{Extension, Json},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use talkbridge_pipeline::PipelineError;
use talkbridge_types::{Language, VoicePreference};
use thiserror::Error;

/// API error type mapping to HTTP status codes.
///
/// Every relay handler converts failures into one of these at the top
/// level; the response body is always `{"error": message}` and no
/// partial broadcast is ever emitted on the error path.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid input: {0}")]
    BadRequest(String),
    #[error("internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

impl From<PipelineError> for ApiError {
    fn from(e: PipelineError) -> Self {
        match e {
            // Empty recognizer output gets the user-facing message the
            // client displays verbatim.
            PipelineError::EmptyTranscript => {
                ApiError::BadRequest("No speech detected".to_string())
            }
            PipelineError::EmptyTranslation => {
                ApiError::BadRequest("Translation returned no text".to_string())
            }
            PipelineError::Config(msg) => ApiError::Internal(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

fn default_from_lang() -> Language {
    Language::En
}

/// Request body for `POST /translate`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateRequest {
    pub content: String,
    #[serde(default = "default_from_lang")]
    pub from_lang: Language,
}

/// Handler for `POST /translate` — the text-only translation surface.
///
/// No broadcast; the translation is returned directly to the caller.
pub async fn translate_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<TranslateRequest>,
) -> Result<Json<Value>, ApiError> {
    let translated = state
        .translator
        .translate(&payload.content, payload.from_lang)
        .await?;

    Ok(Json(json!({ "translated": translated })))
}

/// Request body for `POST /tts`.
#[derive(Debug, Deserialize)]
pub struct TtsRequest {
    pub text: String,
    #[serde(default)]
    pub gender: VoicePreference,
    /// Language of `text`, used together with `gender` to pick a voice.
    #[serde(default = "default_from_lang")]
    pub lang: Language,
}

/// Handler for `POST /tts` — standalone speech synthesis.
pub async fn tts_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<TtsRequest>,
) -> Result<Json<Value>, ApiError> {
    if payload.text.trim().is_empty() {
        return Err(ApiError::BadRequest("No text provided".to_string()));
    }

    let voice = state
        .synthesizer
        .voice_for(payload.gender, payload.lang)
        .to_string();
    let audio_url = state
        .synthesizer
        .synthesize_data_uri(&payload.text, &voice)
        .await?;

    Ok(Json(json!({ "audioUrl": audio_url })))
}

/// Handler for `GET /deepgram-token`.
///
/// Hands the server-held realtime transcription credential to the
/// browser so it can open its own streaming recognition connection.
pub async fn realtime_token_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Json<Value> {
    Json(json!({ "token": state.transcriber.realtime_token() }))
}

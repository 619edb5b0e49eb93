//! Talkbridge server library logic.
//!
//! The HTTP surface is a set of stateless relay endpoints: each performs
//! one external-API-backed operation and publishes its result to a
//! room's broadcast channel. Clients receive those broadcasts over the
//! WebSocket endpoint.

pub mod api;
pub mod api_message;
pub mod api_signal;
pub mod api_voice;
pub mod api_ws;
pub mod config;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Extension, Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use talkbridge_pipeline::{Synthesizer, Transcriber, Translator};
use talkbridge_rooms::RoomHub;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};

/// Application state shared across all request handlers.
///
/// Everything here is constructed in `main` and injected — handlers
/// never reach for process-global state.
#[derive(Clone)]
pub struct AppState {
    /// Room broadcast hub.
    pub hub: RoomHub,
    /// Translation pipeline client.
    pub translator: Arc<Translator>,
    /// Speech-to-text pipeline client.
    pub transcriber: Arc<Transcriber>,
    /// Text-to-speech pipeline client.
    pub synthesizer: Arc<Synthesizer>,
}

/// Maximum request body size for JSON endpoints (2 MiB).
const MAX_REQUEST_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Maximum request body size for voice uploads (20 MiB). The pipeline
/// enforces its own tighter limit on the audio part.
const MAX_VOICE_BODY_BYTES: usize = 20 * 1024 * 1024;

/// Health check handler.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Builds the application router with all routes.
pub fn app(state: AppState) -> Router {
    // Voice uploads need a larger body limit than the JSON endpoints.
    let voice_routes = Router::new()
        .route("/voice", post(api_voice::voice_relay_handler))
        .layer(DefaultBodyLimit::max(MAX_VOICE_BODY_BYTES));

    let router = Router::new()
        .route("/health", get(health))
        .route("/translate", post(api::translate_handler))
        .route("/tts", post(api::tts_handler))
        .route("/deepgram-token", get(api::realtime_token_handler))
        .route("/message", post(api_message::message_relay_handler))
        .route("/signal", post(api_signal::signal_relay_handler))
        .merge(voice_routes)
        .route("/ws", get(api_ws::ws_handler));

    // Serve client static files if the directory exists.
    // Configured via TALKBRIDGE_CLIENT_DIR env var; defaults to "client/dist".
    let client_dir =
        std::env::var("TALKBRIDGE_CLIENT_DIR").unwrap_or_else(|_| "client/dist".to_string());
    let router = if std::path::Path::new(&client_dir).join("index.html").exists() {
        tracing::info!(path = %client_dir, "serving client static files");
        let index = format!("{}/index.html", client_dir);
        router.fallback_service(ServeDir::new(&client_dir).fallback(ServeFile::new(index)))
    } else {
        tracing::info!(path = %client_dir, "client directory not found, skipping static file serving");
        router
    };

    router
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(Extension(Arc::new(state)))
}

//! Chat message and signaling envelope definitions.
//!
//! These are the payloads that cross the room broadcast channel. Field
//! names are camelCase on the wire to match the browser client.

use crate::Language;
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Length of the random suffix appended to message ids.
const ID_SUFFIX_LEN: usize = 6;

/// Generates a fresh message id: unix milliseconds plus a short random
/// alphanumeric suffix. Practically unique, not cryptographically so.
pub fn message_id() -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(ID_SUFFIX_LEN)
        .map(|b| (b as char).to_ascii_lowercase())
        .collect();
    format!("{}-{}", millis, suffix)
}

/// A translated chat message as delivered to room subscribers.
///
/// Created by a relay endpoint, immutable once broadcast. The server
/// keeps no copy; each client retains its own in-memory transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    /// Relay-assigned id (see [`message_id`]).
    pub id: String,
    /// The original text, in `from_lang`.
    pub text: String,
    /// The translation, in the complement of `from_lang`.
    pub translated: String,
    /// Source language of `text`.
    pub from_lang: Language,
    /// Client-generated participant id of the sender.
    pub sender: String,
    /// Self-contained `data:audio/mpeg;base64,...` URI with synthesized
    /// speech for `translated`. Present only for voice messages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
}

/// An opaque WebRTC signaling envelope.
///
/// `kind` is one of `offer`, `answer`, or `ice-candidate` by convention,
/// but the relay forwards envelopes verbatim without validating either
/// the kind or the payload. Echo suppression by `sender` happens
/// client-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalEnvelope {
    pub sender: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub payload: serde_json::Value,
}

/// An event published to a room's broadcast channel.
///
/// Serializes with the wire event names the browser client listens for:
/// `new-message` and `webrtc-signal`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum RoomEvent {
    NewMessage(ChatMessage),
    WebrtcSignal(SignalEnvelope),
}

impl RoomEvent {
    /// Returns the wire event name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::NewMessage(_) => "new-message",
            Self::WebrtcSignal(_) => "webrtc-signal",
        }
    }
}

//! In-process room broadcast hub.
//!
//! Manages active subscriber sessions and per-room subscription sets.
//! Relay endpoints publish [`RoomEvent`]s; the hub fans each event out
//! to every session subscribed to the room's channel. The hub is
//! injected into its users (it is cheap to clone), never reached through
//! process-global state.

use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use talkbridge_types::RoomEvent;
use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

/// Returns the broadcast channel name for a room code.
///
/// The code is used verbatim, case-sensitively; two sessions with the
/// same code are the same room.
pub fn channel_name(room_code: &str) -> String {
    format!("room-{}", room_code)
}

/// A broadcast frame as delivered to subscribers:
/// `{"channel": ..., "event": ..., "data": ...}`.
#[derive(Serialize)]
struct WireFrame<'a> {
    channel: &'a str,
    #[serde(flatten)]
    event: &'a RoomEvent,
}

/// Manages subscriber sessions and room subscriptions.
#[derive(Clone, Default)]
pub struct RoomHub {
    /// Active sessions: session id -> outbound frame sender.
    sessions: Arc<RwLock<HashMap<Uuid, mpsc::Sender<String>>>>,
    /// Subscriptions: channel name -> set of session ids.
    room_subscriptions: Arc<RwLock<HashMap<String, HashSet<Uuid>>>>,
    /// Reverse mapping: session id -> set of channel names.
    session_rooms: Arc<RwLock<HashMap<Uuid, HashSet<String>>>>,
}

impl RoomHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a session and returns its unique id.
    pub async fn add_session(&self, sender: mpsc::Sender<String>) -> Uuid {
        let session_id = Uuid::new_v4();
        self.sessions.write().await.insert(session_id, sender);
        session_id
    }

    /// Removes a session and all of its subscriptions.
    ///
    /// Lock ordering: sessions → room_subscriptions → session_rooms,
    /// matching `subscribe`/`unsubscribe` to prevent deadlocks. Safe to
    /// call more than once for the same id.
    pub async fn remove_session(&self, session_id: Uuid) {
        self.sessions.write().await.remove(&session_id);

        let channels = {
            let session_rooms = self.session_rooms.read().await;
            session_rooms.get(&session_id).cloned()
        };

        if let Some(ref channels) = channels {
            let mut room_subs = self.room_subscriptions.write().await;
            for channel in channels {
                if let Some(listeners) = room_subs.get_mut(channel) {
                    listeners.remove(&session_id);
                    if listeners.is_empty() {
                        room_subs.remove(channel);
                    }
                }
            }
        }

        if channels.is_some() {
            self.session_rooms.write().await.remove(&session_id);
        }
    }

    /// Subscribes a session to a room's channel.
    pub async fn subscribe(&self, channel: String, session_id: Uuid) {
        let mut room_subs = self.room_subscriptions.write().await;
        room_subs
            .entry(channel.clone())
            .or_default()
            .insert(session_id);

        let mut session_rooms = self.session_rooms.write().await;
        session_rooms.entry(session_id).or_default().insert(channel);
    }

    /// Unsubscribes a session from a room's channel. The channel entry
    /// disappears with its last subscriber.
    pub async fn unsubscribe(&self, channel: &str, session_id: Uuid) {
        let mut room_subs = self.room_subscriptions.write().await;
        if let Some(listeners) = room_subs.get_mut(channel) {
            listeners.remove(&session_id);
            if listeners.is_empty() {
                room_subs.remove(channel);
            }
        }

        let mut session_rooms = self.session_rooms.write().await;
        if let Some(channels) = session_rooms.get_mut(&session_id) {
            channels.remove(channel);
            if channels.is_empty() {
                session_rooms.remove(&session_id);
            }
        }
    }

    /// Number of sessions currently subscribed to a channel.
    pub async fn subscriber_count(&self, channel: &str) -> usize {
        self.room_subscriptions
            .read()
            .await
            .get(channel)
            .map(|listeners| listeners.len())
            .unwrap_or(0)
    }

    /// Serializes an event and broadcasts it to every subscriber of the
    /// room's channel, including the publisher's own session if it is
    /// subscribed.
    pub async fn publish(&self, room_code: &str, event: &RoomEvent) {
        let channel = channel_name(room_code);
        let frame = WireFrame {
            channel: &channel,
            event,
        };
        match serde_json::to_string(&frame) {
            Ok(json) => self.broadcast(&channel, json).await,
            Err(e) => {
                tracing::error!(
                    channel = %channel,
                    event = event.name(),
                    "failed to serialize room event for broadcast: {}",
                    e
                );
            }
        }
    }

    /// Broadcasts a serialized frame to all subscribers of a channel.
    pub async fn broadcast(&self, channel: &str, frame_json: String) {
        let room_subs = self.room_subscriptions.read().await;
        if let Some(listeners) = room_subs.get(channel) {
            let sessions = self.sessions.read().await;
            for session_id in listeners {
                if let Some(sender) = sessions.get(session_id) {
                    if let Err(e) = sender.try_send(frame_json.clone()) {
                        tracing::warn!(
                            session_id = %session_id,
                            channel = %channel,
                            "dropping broadcast frame for slow consumer: {}",
                            e
                        );
                    }
                }
            }
        }
    }
}

//! Per-connection client session and its state machine.
//!
//! A session moves through `NotJoined → Joined{Idle, Recording, InCall}`
//! and back. Joining subscribes the session to the room's broadcast
//! channel; leaving — explicit or via teardown — releases the
//! subscription and the hub registration.

use crate::hub::{channel_name, RoomHub};
use thiserror::Error;
use tokio::sync::mpsc;
use uuid::Uuid;

/// What a joined session is currently doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Activity {
    #[default]
    Idle,
    /// Capturing microphone audio for the voice relay.
    Recording,
    /// In a peer-to-peer call negotiated over the signal relay.
    InCall,
}

/// Session lifecycle state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    NotJoined,
    Joined { room_code: String, activity: Activity },
}

/// Errors produced by invalid session transitions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("room code must not be empty")]
    EmptyRoomCode,

    #[error("already joined room {0}")]
    AlreadyJoined(String),

    #[error("not joined to any room")]
    NotJoined,

    #[error("cannot {action} while {current}")]
    InvalidActivity {
        action: &'static str,
        current: &'static str,
    },
}

fn activity_label(activity: Activity) -> &'static str {
    match activity {
        Activity::Idle => "idle",
        Activity::Recording => "recording",
        Activity::InCall => "in a call",
    }
}

/// One connection's registration with the [`RoomHub`].
///
/// Dropping the session deregisters it; callers on an async path should
/// prefer the explicit [`close`](RoomSession::close) so cleanup is
/// awaited rather than spawned.
pub struct RoomSession {
    hub: RoomHub,
    session_id: Uuid,
    participant: String,
    state: SessionState,
    closed: bool,
}

impl RoomSession {
    /// Registers a new session with the hub. The session starts in
    /// `NotJoined`; frames broadcast to rooms it later joins are
    /// delivered through `sender`.
    pub async fn connect(
        hub: RoomHub,
        participant: impl Into<String>,
        sender: mpsc::Sender<String>,
    ) -> Self {
        let session_id = hub.add_session(sender).await;
        Self {
            hub,
            session_id,
            participant: participant.into(),
            state: SessionState::NotJoined,
            closed: false,
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// The client-generated participant id this session connected with.
    pub fn participant(&self) -> &str {
        &self.participant
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// `NotJoined → Joined{Idle}`: subscribes to the room's channel.
    pub async fn join(&mut self, room_code: &str) -> Result<(), SessionError> {
        match &self.state {
            SessionState::Joined { room_code, .. } => {
                Err(SessionError::AlreadyJoined(room_code.clone()))
            }
            SessionState::NotJoined => {
                if room_code.is_empty() {
                    return Err(SessionError::EmptyRoomCode);
                }
                self.hub
                    .subscribe(channel_name(room_code), self.session_id)
                    .await;
                self.state = SessionState::Joined {
                    room_code: room_code.to_string(),
                    activity: Activity::Idle,
                };
                tracing::debug!(
                    participant = %self.participant,
                    room = %room_code,
                    "session joined room"
                );
                Ok(())
            }
        }
    }

    /// `any → NotJoined`: releases the room subscription. Idempotent —
    /// leaving while not joined is a no-op, matching teardown paths that
    /// cannot know the current state.
    pub async fn leave(&mut self) {
        if let SessionState::Joined { room_code, .. } = &self.state {
            let channel = channel_name(room_code);
            self.hub.unsubscribe(&channel, self.session_id).await;
            tracing::debug!(
                participant = %self.participant,
                room = %room_code,
                "session left room"
            );
            self.state = SessionState::NotJoined;
        }
    }

    /// `Joined{Idle} → Joined{Recording}`.
    pub fn start_recording(&mut self) -> Result<(), SessionError> {
        self.set_activity(Activity::Recording, "start recording")
    }

    /// `Joined{Recording} → Joined{Idle}`.
    pub fn stop_recording(&mut self) -> Result<(), SessionError> {
        self.clear_activity(Activity::Recording, "stop recording")
    }

    /// `Joined{Idle} → Joined{InCall}`.
    pub fn start_call(&mut self) -> Result<(), SessionError> {
        self.set_activity(Activity::InCall, "start a call")
    }

    /// `Joined{InCall} → Joined{Idle}`.
    pub fn end_call(&mut self) -> Result<(), SessionError> {
        self.clear_activity(Activity::InCall, "end a call")
    }

    fn set_activity(
        &mut self,
        target: Activity,
        action: &'static str,
    ) -> Result<(), SessionError> {
        match &mut self.state {
            SessionState::NotJoined => Err(SessionError::NotJoined),
            SessionState::Joined { activity, .. } => match *activity {
                Activity::Idle => {
                    *activity = target;
                    Ok(())
                }
                current => Err(SessionError::InvalidActivity {
                    action,
                    current: activity_label(current),
                }),
            },
        }
    }

    fn clear_activity(
        &mut self,
        expected: Activity,
        action: &'static str,
    ) -> Result<(), SessionError> {
        match &mut self.state {
            SessionState::NotJoined => Err(SessionError::NotJoined),
            SessionState::Joined { activity, .. } => {
                if *activity == expected {
                    *activity = Activity::Idle;
                    Ok(())
                } else {
                    Err(SessionError::InvalidActivity {
                        action,
                        current: activity_label(*activity),
                    })
                }
            }
        }
    }

    /// Explicit teardown: leaves the room and deregisters the session.
    pub async fn close(mut self) {
        self.leave().await;
        self.hub.remove_session(self.session_id).await;
        self.closed = true;
    }
}

impl Drop for RoomSession {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            let hub = self.hub.clone();
            let session_id = self.session_id;
            handle.spawn(async move {
                hub.remove_session(session_id).await;
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn connected_session(hub: &RoomHub) -> (RoomSession, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(8);
        (RoomSession::connect(hub.clone(), "P1", tx).await, rx)
    }

    #[tokio::test]
    async fn join_requires_nonempty_room_code() {
        let hub = RoomHub::new();
        let (mut session, _rx) = connected_session(&hub).await;

        assert_eq!(session.join("").await, Err(SessionError::EmptyRoomCode));
        assert_eq!(*session.state(), SessionState::NotJoined);

        session.join("ABC123").await.unwrap();
        assert_eq!(
            *session.state(),
            SessionState::Joined {
                room_code: "ABC123".to_string(),
                activity: Activity::Idle,
            }
        );
    }

    #[tokio::test]
    async fn double_join_is_rejected() {
        let hub = RoomHub::new();
        let (mut session, _rx) = connected_session(&hub).await;

        session.join("R1").await.unwrap();
        assert_eq!(
            session.join("R2").await,
            Err(SessionError::AlreadyJoined("R1".to_string()))
        );
    }

    #[tokio::test]
    async fn recording_and_call_are_mutually_exclusive() {
        let hub = RoomHub::new();
        let (mut session, _rx) = connected_session(&hub).await;
        session.join("R1").await.unwrap();

        session.start_recording().unwrap();
        assert!(matches!(
            session.start_call(),
            Err(SessionError::InvalidActivity { .. })
        ));
        session.stop_recording().unwrap();

        session.start_call().unwrap();
        assert!(matches!(
            session.start_recording(),
            Err(SessionError::InvalidActivity { .. })
        ));
        session.end_call().unwrap();
    }

    #[tokio::test]
    async fn activity_requires_a_joined_room() {
        let hub = RoomHub::new();
        let (mut session, _rx) = connected_session(&hub).await;

        assert_eq!(session.start_recording(), Err(SessionError::NotJoined));
        assert_eq!(session.end_call(), Err(SessionError::NotJoined));
    }

    #[tokio::test]
    async fn leave_releases_subscription_and_is_idempotent() {
        let hub = RoomHub::new();
        let (mut session, _rx) = connected_session(&hub).await;
        let channel = channel_name("R1");

        session.join("R1").await.unwrap();
        assert_eq!(hub.subscriber_count(&channel).await, 1);

        session.leave().await;
        assert_eq!(hub.subscriber_count(&channel).await, 0);
        assert_eq!(*session.state(), SessionState::NotJoined);

        // A second leave is a no-op.
        session.leave().await;
    }

    #[tokio::test]
    async fn leave_from_mid_call_returns_to_not_joined() {
        let hub = RoomHub::new();
        let (mut session, _rx) = connected_session(&hub).await;

        session.join("R1").await.unwrap();
        session.start_call().unwrap();
        session.leave().await;
        assert_eq!(*session.state(), SessionState::NotJoined);
    }

    #[tokio::test]
    async fn close_removes_the_session_from_the_hub() {
        let hub = RoomHub::new();
        let (mut session, _rx) = connected_session(&hub).await;
        let channel = channel_name("R1");

        session.join("R1").await.unwrap();
        session.close().await;

        assert_eq!(hub.subscriber_count(&channel).await, 0);
    }
}

//! Room broadcast hub and client session model for talkbridge.
//!
//! A room is a logical broadcast group identified by a user-supplied
//! code; it exists exactly as long as it has at least one subscriber.
//! The [`RoomHub`] is the in-process pub/sub fabric relays publish into,
//! and [`RoomSession`] owns one connection's hub registration together
//! with its `NotJoined → Joined{Idle, Recording, InCall}` state machine.

pub mod hub;
pub mod session;

pub use hub::{channel_name, RoomHub};
pub use session::{Activity, RoomSession, SessionError, SessionState};

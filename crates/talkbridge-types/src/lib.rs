//! Shared types and constants for the talkbridge platform.
//!
//! This crate provides the foundational types used across all talkbridge
//! crates: the two-party language model, voice preferences, the chat
//! message and signaling envelopes, and room event wrappers.
//!
//! No crate in the workspace depends on anything *except*
//! `talkbridge-types` for cross-cutting type definitions. This keeps the
//! dependency graph clean and prevents circular dependencies.

use serde::{Deserialize, Serialize};

pub mod message;

pub use message::{message_id, ChatMessage, RoomEvent, SignalEnvelope};

/// The two languages of a talkbridge conversation.
///
/// The system is strictly bilingual: every message carries exactly one
/// source language, and the translation target is always the
/// [complement](Language::complement). This does not generalize to more
/// than two languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    /// English.
    #[serde(rename = "en")]
    En,
    /// Vietnamese.
    #[serde(rename = "vi")]
    Vi,
}

impl Language {
    /// Returns the other language of the pair.
    pub fn complement(self) -> Self {
        match self {
            Self::En => Self::Vi,
            Self::Vi => Self::En,
        }
    }

    /// Returns the wire code for this language (`"en"` / `"vi"`).
    pub fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Vi => "vi",
        }
    }

    /// Returns the English display name, as used in translation prompts.
    pub fn name(self) -> &'static str {
        match self {
            Self::En => "English",
            Self::Vi => "Vietnamese",
        }
    }
}

impl std::str::FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "en" => Ok(Self::En),
            "vi" => Ok(Self::Vi),
            other => Err(UnknownLanguage(other.to_string())),
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Error returned when a language code is neither `en` nor `vi`.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown language code: {0}")]
pub struct UnknownLanguage(pub String);

/// A two-valued synthesized-voice selector.
///
/// Combined with the target [`Language`], the preference resolves to a
/// provider-specific voice identifier via configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoicePreference {
    #[default]
    Male,
    Female,
}

impl VoicePreference {
    /// Parses a form-field value. Anything other than `"female"` selects
    /// the male voice, mirroring the browser client's default.
    pub fn from_param(value: &str) -> Self {
        if value == "female" {
            Self::Female
        } else {
            Self::Male
        }
    }
}

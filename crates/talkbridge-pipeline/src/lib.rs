//! Hosted-API pipelines for the talkbridge platform.
//!
//! Wraps the three external services every message flows through:
//! machine translation (a hosted chat-completion model), speech-to-text
//! transcription, and text-to-speech synthesis. Each client is a thin,
//! stateless wrapper around a single HTTP call — no retries, no caching,
//! no conversation memory. Composition (transcribe → translate →
//! synthesize) happens in the relay layer.

pub mod config;
pub mod error;
pub mod stt;
pub mod translate;
pub mod tts;

pub use config::{SynthesizerConfig, TranscriberConfig, TranslatorConfig, VoiceMap};
pub use error::PipelineError;
pub use stt::Transcriber;
pub use translate::Translator;
pub use tts::Synthesizer;

//! Provider configuration for the hosted pipelines.
//!
//! Every field has a default so a missing config section still
//! deserializes; API keys default to empty, which surfaces as a
//! request-time configuration error rather than a startup failure.

use serde::Deserialize;
use std::fmt;
use talkbridge_types::{Language, VoicePreference};

fn default_translate_base_url() -> String {
    "https://openrouter.ai/api/v1".to_string()
}

fn default_translate_model() -> String {
    "openai/gpt-4o-mini".to_string()
}

fn default_transcribe_model() -> String {
    "openai/whisper-large-v3".to_string()
}

fn default_synthesis_base_url() -> String {
    "https://api.elevenlabs.io/v1".to_string()
}

fn default_synthesis_model() -> String {
    "eleven_multilingual_v2".to_string()
}

/// Configuration for the chat-completion translation client.
#[derive(Clone, Deserialize)]
pub struct TranslatorConfig {
    #[serde(default = "default_translate_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_translate_model")]
    pub model: String,
    /// Optional `HTTP-Referer` header, required by some model routers
    /// for request attribution.
    #[serde(default)]
    pub referer: Option<String>,
    /// Optional `X-Title` header naming the calling application.
    #[serde(default)]
    pub app_title: Option<String>,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            base_url: default_translate_base_url(),
            api_key: String::new(),
            model: default_translate_model(),
            referer: None,
            app_title: None,
        }
    }
}

impl fmt::Debug for TranslatorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranslatorConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("referer", &self.referer)
            .field("app_title", &self.app_title)
            .finish()
    }
}

/// Configuration for the hosted transcription client.
#[derive(Clone, Deserialize)]
pub struct TranscriberConfig {
    #[serde(default = "default_translate_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_transcribe_model")]
    pub model: String,
    /// Credential handed to browsers for a direct realtime transcription
    /// connection (`GET /deepgram-token`).
    #[serde(default)]
    pub realtime_token: String,
}

impl Default for TranscriberConfig {
    fn default() -> Self {
        Self {
            base_url: default_translate_base_url(),
            api_key: String::new(),
            model: default_transcribe_model(),
            realtime_token: String::new(),
        }
    }
}

impl fmt::Debug for TranscriberConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranscriberConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("realtime_token", &"[REDACTED]")
            .finish()
    }
}

/// Static mapping from voice preference and target language to a
/// provider voice identifier.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VoiceMap {
    #[serde(default)]
    pub male_en: String,
    #[serde(default)]
    pub female_en: String,
    #[serde(default)]
    pub male_vi: String,
    #[serde(default)]
    pub female_vi: String,
}

impl VoiceMap {
    /// Resolves the voice id for a preference and target language.
    pub fn select(&self, preference: VoicePreference, language: Language) -> &str {
        match (preference, language) {
            (VoicePreference::Male, Language::En) => &self.male_en,
            (VoicePreference::Female, Language::En) => &self.female_en,
            (VoicePreference::Male, Language::Vi) => &self.male_vi,
            (VoicePreference::Female, Language::Vi) => &self.female_vi,
        }
    }
}

/// Configuration for the speech-synthesis client.
#[derive(Clone, Deserialize)]
pub struct SynthesizerConfig {
    #[serde(default = "default_synthesis_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_synthesis_model")]
    pub model_id: String,
    #[serde(default)]
    pub voices: VoiceMap,
}

impl Default for SynthesizerConfig {
    fn default() -> Self {
        Self {
            base_url: default_synthesis_base_url(),
            api_key: String::new(),
            model_id: default_synthesis_model(),
            voices: VoiceMap::default(),
        }
    }
}

impl fmt::Debug for SynthesizerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SynthesizerConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("model_id", &self.model_id)
            .field("voices", &self.voices)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn voice_map_covers_all_combinations() {
        let voices = VoiceMap {
            male_en: "m-en".to_string(),
            female_en: "f-en".to_string(),
            male_vi: "m-vi".to_string(),
            female_vi: "f-vi".to_string(),
        };

        assert_eq!(voices.select(VoicePreference::Male, Language::En), "m-en");
        assert_eq!(voices.select(VoicePreference::Female, Language::En), "f-en");
        assert_eq!(voices.select(VoicePreference::Male, Language::Vi), "m-vi");
        assert_eq!(voices.select(VoicePreference::Female, Language::Vi), "f-vi");
    }

    #[test]
    fn debug_output_redacts_keys() {
        let config = TranslatorConfig {
            api_key: "sk-secret".to_string(),
            ..Default::default()
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn empty_section_deserializes_with_defaults() {
        let config: TranscriberConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.model, "openai/whisper-large-v3");
        assert!(config.api_key.is_empty());
    }
}

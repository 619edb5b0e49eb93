//! Text-to-speech over a hosted synthesis API.

use crate::config::SynthesizerConfig;
use crate::error::PipelineError;
use base64::Engine;
use serde_json::json;
use talkbridge_types::{Language, VoicePreference};

/// Maximum text input size for synthesis (64 KiB). Prevents resource
/// exhaustion from oversized synthesis requests.
const MAX_TTS_INPUT_BYTES: usize = 64 * 1024;

/// Client for the hosted speech-synthesis API.
#[derive(Debug, Clone)]
pub struct Synthesizer {
    client: reqwest::Client,
    config: SynthesizerConfig,
}

impl Synthesizer {
    pub fn new(config: SynthesizerConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Resolves the provider voice id for a preference and target language.
    pub fn voice_for(&self, preference: VoicePreference, language: Language) -> &str {
        self.config.voices.select(preference, language)
    }

    /// Synthesizes speech for `text` with the given provider voice.
    ///
    /// Returns the raw audio bytes (MPEG) exactly as the provider
    /// produced them.
    pub async fn synthesize(&self, text: &str, voice_id: &str) -> Result<Vec<u8>, PipelineError> {
        if text.len() > MAX_TTS_INPUT_BYTES {
            return Err(PipelineError::Config(format!(
                "text exceeds maximum size: {} bytes (limit: {} bytes)",
                text.len(),
                MAX_TTS_INPUT_BYTES
            )));
        }
        if self.config.api_key.is_empty() {
            return Err(PipelineError::Config(
                "synthesis api_key is not configured".to_string(),
            ));
        }
        if voice_id.is_empty() {
            return Err(PipelineError::Config(
                "no voice id configured for the requested voice".to_string(),
            ));
        }

        let url = format!(
            "{}/text-to-speech/{}",
            self.config.base_url.trim_end_matches('/'),
            voice_id
        );

        let response = self
            .client
            .post(&url)
            .header("xi-api-key", &self.config.api_key)
            .json(&json!({
                "text": text,
                "model_id": self.config.model_id,
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            tracing::error!(%status, detail = %detail, "synthesis API returned non-success");
            return Err(PipelineError::Upstream(format!(
                "synthesis API returned {}",
                status
            )));
        }

        Ok(response.bytes().await?.to_vec())
    }

    /// Synthesizes speech and wraps it in a self-contained
    /// `data:audio/mpeg;base64,...` URI for in-band delivery.
    pub async fn synthesize_data_uri(
        &self,
        text: &str,
        voice_id: &str,
    ) -> Result<String, PipelineError> {
        let audio = self.synthesize(text, voice_id).await?;
        Ok(to_data_uri(&audio))
    }
}

/// Encodes audio bytes as a `data:audio/mpeg;base64,...` URI.
pub fn to_data_uri(audio: &[u8]) -> String {
    format!(
        "data:audio/mpeg;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(audio)
    )
}

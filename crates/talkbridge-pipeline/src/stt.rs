//! Speech-to-text over a hosted transcription API.

use crate::config::TranscriberConfig;
use crate::error::PipelineError;
use serde::Deserialize;

/// Maximum audio input size for transcription (10 MiB). Prevents OOM
/// from oversized payloads.
const MAX_STT_INPUT_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Deserialize)]
struct Transcription {
    text: Option<String>,
}

/// Client for the hosted transcription API.
#[derive(Debug, Clone)]
pub struct Transcriber {
    client: reqwest::Client,
    config: TranscriberConfig,
}

impl Transcriber {
    pub fn new(config: TranscriberConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Returns the credential browsers use for a direct realtime
    /// transcription connection.
    pub fn realtime_token(&self) -> &str {
        &self.config.realtime_token
    }

    /// Transcribes recorded audio to text.
    ///
    /// The audio is uploaded exactly as captured — no resampling or
    /// noise suppression beyond what the recorder already applied.
    /// Fails with [`PipelineError::EmptyTranscript`] when the recognizer
    /// returns blank or whitespace-only text.
    pub async fn transcribe(
        &self,
        audio: Vec<u8>,
        content_type: &str,
    ) -> Result<String, PipelineError> {
        if audio.len() > MAX_STT_INPUT_BYTES {
            return Err(PipelineError::Config(format!(
                "audio exceeds maximum size: {} bytes (limit: {} bytes)",
                audio.len(),
                MAX_STT_INPUT_BYTES
            )));
        }
        if self.config.api_key.is_empty() {
            return Err(PipelineError::Config(
                "transcription api_key is not configured".to_string(),
            ));
        }

        let part = reqwest::multipart::Part::bytes(audio)
            .file_name("audio.webm")
            .mime_str(content_type)?;
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("model", self.config.model.clone());

        let url = format!(
            "{}/audio/transcriptions",
            self.config.base_url.trim_end_matches('/')
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            tracing::error!(%status, detail = %detail, "transcription API returned non-success");
            return Err(PipelineError::Upstream(format!(
                "transcription API returned {}",
                status
            )));
        }

        let transcription: Transcription = response.json().await?;
        let text = transcription
            .text
            .map(|t| t.trim().to_string())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(PipelineError::EmptyTranscript);
        }

        Ok(text)
    }
}

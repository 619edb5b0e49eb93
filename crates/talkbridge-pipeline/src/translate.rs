//! Translation via a hosted chat-completion model.
//!
//! One stateless POST per call with a fixed one-shot system instruction.
//! No retry, no caching, no conversation memory; overlong input is
//! rejected by the upstream API, not locally.

use crate::config::TranslatorConfig;
use crate::error::PipelineError;
use serde::Deserialize;
use serde_json::json;
use talkbridge_types::Language;

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    choices: Option<Vec<Choice>>,
    error: Option<UpstreamError>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UpstreamError {
    message: Option<String>,
}

/// Client for the hosted translation model.
#[derive(Debug, Clone)]
pub struct Translator {
    client: reqwest::Client,
    config: TranslatorConfig,
}

impl Translator {
    pub fn new(config: TranslatorConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Translates `text` from `from` into its complement language.
    ///
    /// Returns the trimmed translation. Fails with
    /// [`PipelineError::EmptyTranslation`] when the model returns an
    /// empty or missing completion.
    pub async fn translate(&self, text: &str, from: Language) -> Result<String, PipelineError> {
        if self.config.api_key.is_empty() {
            return Err(PipelineError::Config(
                "translation api_key is not configured".to_string(),
            ));
        }

        let target = from.complement();
        let body = json!({
            "model": self.config.model,
            "messages": [
                {
                    "role": "system",
                    "content": format!(
                        "You are a translator. Translate the following text to {}. \
                         Only output the translation, nothing else.",
                        target.name()
                    )
                },
                { "role": "user", "content": text }
            ]
        });

        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );

        let mut request = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&body);
        if let Some(referer) = &self.config.referer {
            request = request.header("HTTP-Referer", referer);
        }
        if let Some(title) = &self.config.app_title {
            request = request.header("X-Title", title);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            tracing::error!(%status, detail = %detail, "translation API returned non-success");
            return Err(PipelineError::Upstream(format!(
                "translation API returned {}",
                status
            )));
        }

        let completion: ChatCompletion = response.json().await?;
        if let Some(error) = completion.error {
            return Err(PipelineError::Upstream(
                error
                    .message
                    .unwrap_or_else(|| "translation API reported an error".to_string()),
            ));
        }

        let translated = completion
            .choices
            .and_then(|mut choices| {
                if choices.is_empty() {
                    None
                } else {
                    choices.swap_remove(0).message.content
                }
            })
            .map(|content| content.trim().to_string())
            .unwrap_or_default();

        if translated.is_empty() {
            return Err(PipelineError::EmptyTranslation);
        }

        tracing::debug!(from = %from, to = %target, "translation completed");
        Ok(translated)
    }
}

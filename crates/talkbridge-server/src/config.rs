//! Server configuration loading from file and environment variables.

use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use talkbridge_pipeline::{SynthesizerConfig, TranscriberConfig, TranslatorConfig};
use thiserror::Error;

/// Top-level server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Server network settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Translation provider settings.
    #[serde(default)]
    pub translation: TranslatorConfig,

    /// Transcription provider settings.
    #[serde(default)]
    pub transcription: TranscriberConfig,

    /// Speech-synthesis provider settings.
    #[serde(default)]
    pub synthesis: SynthesizerConfig,
}

/// Network configuration for the HTTP server.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: IpAddr,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "talkbridge_server=debug,info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to output logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Loads configuration from a TOML file, falling back to defaults.
///
/// Environment variable overrides:
/// - `TALKBRIDGE_HOST` / `TALKBRIDGE_PORT` override `[server]`
/// - `TALKBRIDGE_LOG_LEVEL` / `TALKBRIDGE_LOG_JSON` override `[logging]`
/// - `TALKBRIDGE_TRANSLATE_API_KEY`, `TALKBRIDGE_TRANSLATE_MODEL`,
///   `TALKBRIDGE_TRANSLATE_BASE_URL` override `[translation]`
/// - `TALKBRIDGE_TRANSCRIBE_API_KEY`, `TALKBRIDGE_TRANSCRIBE_MODEL`,
///   `TALKBRIDGE_TRANSCRIBE_BASE_URL`, `TALKBRIDGE_REALTIME_TOKEN`
///   override `[transcription]`
/// - `TALKBRIDGE_SYNTH_API_KEY`, `TALKBRIDGE_SYNTH_BASE_URL`, and
///   `TALKBRIDGE_VOICE_{MALE,FEMALE}_{EN,VI}` override `[synthesis]`
///
/// Provider keys left empty cause request-time failures on the affected
/// endpoints, not startup failures.
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(contents) => toml::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = p, "config file not found, using defaults");
                Config::default()
            }
            Err(e) => return Err(ConfigError::FileRead(e)),
        },
        None => Config::default(),
    };

    // Environment variable overrides
    if let Ok(host) = std::env::var("TALKBRIDGE_HOST") {
        if let Ok(parsed) = host.parse() {
            config.server.host = parsed;
        }
    }
    if let Ok(port) = std::env::var("TALKBRIDGE_PORT") {
        if let Ok(parsed) = port.parse() {
            config.server.port = parsed;
        }
    }
    if let Ok(level) = std::env::var("TALKBRIDGE_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Ok(json) = std::env::var("TALKBRIDGE_LOG_JSON") {
        config.logging.json = json == "true" || json == "1";
    }

    if let Ok(key) = std::env::var("TALKBRIDGE_TRANSLATE_API_KEY") {
        config.translation.api_key = key;
    }
    if let Ok(model) = std::env::var("TALKBRIDGE_TRANSLATE_MODEL") {
        config.translation.model = model;
    }
    if let Ok(url) = std::env::var("TALKBRIDGE_TRANSLATE_BASE_URL") {
        config.translation.base_url = url;
    }

    if let Ok(key) = std::env::var("TALKBRIDGE_TRANSCRIBE_API_KEY") {
        config.transcription.api_key = key;
    }
    if let Ok(model) = std::env::var("TALKBRIDGE_TRANSCRIBE_MODEL") {
        config.transcription.model = model;
    }
    if let Ok(url) = std::env::var("TALKBRIDGE_TRANSCRIBE_BASE_URL") {
        config.transcription.base_url = url;
    }
    if let Ok(token) = std::env::var("TALKBRIDGE_REALTIME_TOKEN") {
        config.transcription.realtime_token = token;
    }

    if let Ok(key) = std::env::var("TALKBRIDGE_SYNTH_API_KEY") {
        config.synthesis.api_key = key;
    }
    if let Ok(url) = std::env::var("TALKBRIDGE_SYNTH_BASE_URL") {
        config.synthesis.base_url = url;
    }
    if let Ok(voice) = std::env::var("TALKBRIDGE_VOICE_MALE_EN") {
        config.synthesis.voices.male_en = voice;
    }
    if let Ok(voice) = std::env::var("TALKBRIDGE_VOICE_FEMALE_EN") {
        config.synthesis.voices.female_en = voice;
    }
    if let Ok(voice) = std::env::var("TALKBRIDGE_VOICE_MALE_VI") {
        config.synthesis.voices.male_vi = voice;
    }
    if let Ok(voice) = std::env::var("TALKBRIDGE_VOICE_FEMALE_VI") {
        config.synthesis.voices.female_vi = voice;
    }

    Ok(config)
}

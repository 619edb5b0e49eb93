use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("http transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("upstream API failure: {0}")]
    Upstream(String),

    #[error("no speech detected")]
    EmptyTranscript,

    #[error("translation returned no text")]
    EmptyTranslation,
}

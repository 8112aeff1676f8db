// Error types for the relay
//
// Request-path failures (upstream, extraction) never reach the HTTP layer:
// ChatRelay folds them into reply strings. Startup failures bubble up to main.

use std::path::PathBuf;
use thiserror::Error;

/// Invalid settings detected while building `RelayConfig`
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("GROQ_API_KEY is not set or is blank")]
    MissingApiKey,

    #[error("Excerpt size must be at least 1")]
    ZeroExcerptSize,

    #[error("Upstream timeout must be at least 1 second")]
    ZeroTimeout,

    #[error("Invalid upstream base URL {0:?}")]
    InvalidApiBase(String),
}

/// Failure to load the lyric corpus document
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("Failed to read lyrics file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid lyrics document: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Outcome of a failed call to the completion API
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// The upstream answered with a non-2xx status
    #[error("Upstream returned HTTP {status}")]
    Http { status: u16, body: String },

    /// Connection failure, timeout, or a body that could not be read
    #[error("Upstream request failed: {0}")]
    Network(#[from] reqwest::Error),
}

impl UpstreamError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::Http { status: 429, .. })
    }
}

/// Why a 2xx upstream body did not yield a reply
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractionError {
    /// No `choices`, but the upstream explained itself in `error.message`
    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Response has no usable choices")]
    MissingChoices,

    #[error("Response body is not valid JSON")]
    Malformed,
}

/// Anything that stops the relay from starting or serving
#[derive(Debug, Error)]
pub enum RelayError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Corpus(#[from] CorpusError),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to initialize logging: {0}")]
    Logging(String),
}

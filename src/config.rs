// Startup configuration
//
// Every option can come from the command line or the environment (a `.env`
// file is loaded by main before parsing). `Args` is validated once into an
// immutable `RelayConfig` that is handed to the relay and the server.

use clap::{Parser, ValueEnum};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::ai::{ExcerptStrategy, SamplingMode};
use crate::error::ConfigError;

pub const DEFAULT_API_BASE: &str = "https://api.groq.com";
pub const DEFAULT_MODEL: &str = "mixtral-8x7b-32768";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_EXCERPT_SIZE: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExcerptKind {
    /// Random sample of songs
    Random,
    /// Leading songs in corpus order
    First,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SamplingArg {
    PerRequest,
    Startup,
}

#[derive(Parser, Debug)]
#[command(name = "lyric-relay")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Groq API key
    #[arg(long, env = "GROQ_API_KEY", hide_env_values = true)]
    pub api_key: String,

    #[arg(short, long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// JSON document shaped {"songs":[{"content": "..."}]}
    #[arg(long, env = "LYRICS_PATH", default_value = "data/lyrics.json")]
    pub lyrics_path: PathBuf,

    #[arg(long, env = "GROQ_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    #[arg(long, env = "GROQ_API_BASE", default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    /// Response length cap forwarded to the model
    #[arg(long, env = "MAX_TOKENS")]
    pub max_tokens: Option<u32>,

    #[arg(long, env = "UPSTREAM_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    #[arg(long, env = "EXCERPT_STRATEGY", value_enum, default_value_t = ExcerptKind::Random)]
    pub excerpt_strategy: ExcerptKind,

    #[arg(long, env = "EXCERPT_SIZE", default_value_t = DEFAULT_EXCERPT_SIZE)]
    pub excerpt_size: usize,

    #[arg(long, env = "SAMPLING_MODE", value_enum, default_value_t = SamplingArg::PerRequest)]
    pub sampling_mode: SamplingArg,

    /// Fixed seed for lyric sampling (reproducible prompts)
    #[arg(long, env = "SAMPLE_SEED")]
    pub seed: Option<u64>,
}

/// Validated, immutable relay settings
#[derive(Clone)]
pub struct RelayConfig {
    pub api_key: String,
    pub api_base: String,
    pub model: String,
    pub max_tokens: Option<u32>,
    pub timeout: Duration,
    pub port: u16,
    pub lyrics_path: PathBuf,
    pub excerpt: ExcerptStrategy,
    pub sampling: SamplingMode,
    pub seed: Option<u64>,
}

impl RelayConfig {
    /// Defaults for everything except the key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            port: DEFAULT_PORT,
            lyrics_path: PathBuf::from("data/lyrics.json"),
            excerpt: ExcerptStrategy::Random(DEFAULT_EXCERPT_SIZE),
            sampling: SamplingMode::PerRequest,
            seed: None,
        }
    }

    pub fn from_args(args: Args) -> Result<Self, ConfigError> {
        let excerpt = match args.excerpt_strategy {
            ExcerptKind::Random => ExcerptStrategy::Random(args.excerpt_size),
            ExcerptKind::First => ExcerptStrategy::First(args.excerpt_size),
        };
        let sampling = match args.sampling_mode {
            SamplingArg::PerRequest => SamplingMode::PerRequest,
            SamplingArg::Startup => SamplingMode::Startup,
        };

        let config = Self {
            api_key: args.api_key.trim().to_string(),
            api_base: args.api_base.trim_end_matches('/').to_string(),
            model: args.model,
            max_tokens: args.max_tokens,
            timeout: Duration::from_secs(args.timeout_secs),
            port: args.port,
            lyrics_path: args.lyrics_path,
            excerpt,
            sampling,
            seed: args.seed,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        if self.excerpt.size() == 0 {
            return Err(ConfigError::ZeroExcerptSize);
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        if !(self.api_base.starts_with("http://") || self.api_base.starts_with("https://")) {
            return Err(ConfigError::InvalidApiBase(self.api_base.clone()));
        }
        Ok(())
    }

    pub fn completions_url(&self) -> String {
        format!("{}/openai/v1/chat/completions", self.api_base)
    }
}

// Keeps the key out of logs
impl fmt::Debug for RelayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelayConfig")
            .field("api_key", &"<redacted>")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("timeout", &self.timeout)
            .field("port", &self.port)
            .field("lyrics_path", &self.lyrics_path)
            .field("excerpt", &self.excerpt)
            .field("sampling", &self.sampling)
            .field("seed", &self.seed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(extra: &[&str]) -> Args {
        let mut argv = vec!["lyric-relay", "--api-key", "gsk_test"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults_from_args() {
        let config = RelayConfig::from_args(parse(&[])).unwrap();
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.timeout, Duration::from_secs(15));
        assert_eq!(config.excerpt, ExcerptStrategy::Random(5));
        assert_eq!(config.sampling, SamplingMode::PerRequest);
        assert_eq!(config.max_tokens, None);
        assert_eq!(
            config.completions_url(),
            "https://api.groq.com/openai/v1/chat/completions"
        );
    }

    #[test]
    fn test_first_strategy_and_startup_sampling() {
        let config = RelayConfig::from_args(parse(&[
            "--excerpt-strategy",
            "first",
            "--excerpt-size",
            "3",
            "--sampling-mode",
            "startup",
            "--seed",
            "7",
            "--api-base",
            "http://localhost:9000/",
        ]))
        .unwrap();
        assert_eq!(config.excerpt, ExcerptStrategy::First(3));
        assert_eq!(config.sampling, SamplingMode::Startup);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.api_base, "http://localhost:9000");
    }

    #[test]
    fn test_validation_errors() {
        let blank = RelayConfig::new("   ");
        assert!(matches!(blank.validate(), Err(ConfigError::MissingApiKey)));

        let mut zero = RelayConfig::new("gsk_test");
        zero.excerpt = ExcerptStrategy::First(0);
        assert!(matches!(zero.validate(), Err(ConfigError::ZeroExcerptSize)));

        let mut no_timeout = RelayConfig::new("gsk_test");
        no_timeout.timeout = Duration::ZERO;
        assert!(matches!(no_timeout.validate(), Err(ConfigError::ZeroTimeout)));

        let mut bad_base = RelayConfig::new("gsk_test");
        bad_base.api_base = "api.groq.com".to_string();
        assert!(matches!(
            bad_base.validate(),
            Err(ConfigError::InvalidApiBase(_))
        ));
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = RelayConfig::new("gsk_secret_value");
        let printed = format!("{:?}", config);
        assert!(!printed.contains("gsk_secret_value"));
        assert!(printed.contains("<redacted>"));
    }
}

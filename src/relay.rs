// Chat relay: message in, reply out
//
// Every outcome ends as a ChatReply. Upstream failures, timeouts and bad
// bodies are mapped to fixed reply strings so the HTTP layer always answers
// 200 with {"reply": "..."}.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::ai::prompt_builder::render;
use crate::ai::{
    extract_reply, upstream_error_message, CompletionApi, LyricCorpus, PromptBuilder,
    SamplingMode,
};
use crate::config::RelayConfig;
use crate::error::{ExtractionError, UpstreamError};

pub const INPUT_ERROR_REPLY: &str = "[Input error] Please send a non-empty message.";
pub const RATE_LIMIT_REPLY: &str =
    "[Rate limited] The model is getting too many requests right now. Please wait a moment and try again.";
pub const BACKEND_ERROR_REPLY: &str =
    "[Backend error] Something went wrong while talking to the model. Please try again.";
pub const UPSTREAM_ERROR_PREFIX: &str = "[Groq API error]";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatReply {
    pub reply: String,
}

impl ChatReply {
    fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
        }
    }
}

pub struct ChatRelay {
    prompts: PromptBuilder,
    upstream: Arc<dyn CompletionApi>,
    seed: Option<u64>,
    /// Excerpt chosen once at construction in `SamplingMode::Startup`
    pinned_excerpt: Option<String>,
}

impl ChatRelay {
    pub fn new(
        config: &RelayConfig,
        corpus: Arc<LyricCorpus>,
        upstream: Arc<dyn CompletionApi>,
    ) -> Self {
        let prompts = PromptBuilder::new(corpus, config.excerpt);

        let pinned_excerpt = match config.sampling {
            SamplingMode::Startup => {
                let excerpt = prompts.select_excerpt(&mut rng_for(config.seed));
                info!(
                    lines = excerpt.lines().count(),
                    "Pinned lyric excerpt for all requests"
                );
                Some(excerpt)
            }
            SamplingMode::PerRequest => None,
        };

        Self {
            prompts,
            upstream,
            seed: config.seed,
            pinned_excerpt,
        }
    }

    /// System prompt for a message, honoring the sampling mode
    pub fn system_prompt(&self, message: &str) -> String {
        let context = match &self.pinned_excerpt {
            Some(excerpt) => self.prompts.context_with_excerpt(message, excerpt),
            None => self.prompts.context(message, &mut rng_for(self.seed)),
        };
        debug!(
            language = %context.detected_language,
            excerpt_chars = context.lyrics_excerpt.len(),
            "Built prompt context"
        );
        render(&context)
    }

    pub async fn handle(&self, message: Option<&str>) -> ChatReply {
        let message = match message.map(str::trim) {
            Some(m) if !m.is_empty() => m,
            _ => {
                debug!("Rejected request without a message");
                return ChatReply::new(INPUT_ERROR_REPLY);
            }
        };

        let started = Instant::now();
        let system_prompt = self.system_prompt(message);

        let reply = match self.upstream.complete(&system_prompt, message).await {
            Ok(body) => reply_from_body(&body),
            Err(err) => reply_from_upstream_error(err),
        };

        info!(
            elapsed = ?started.elapsed(),
            reply_chars = reply.len(),
            "Chat request handled"
        );
        ChatReply::new(reply)
    }
}

fn rng_for(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn reply_from_body(body: &str) -> String {
    match extract_reply(body) {
        Ok(text) => text,
        Err(ExtractionError::Upstream(message)) => {
            warn!(%message, "Upstream body carried an error instead of choices");
            format!("{} {}", UPSTREAM_ERROR_PREFIX, message)
        }
        Err(err @ (ExtractionError::MissingChoices | ExtractionError::Malformed)) => {
            warn!(error = %err, "Could not extract reply from upstream body");
            BACKEND_ERROR_REPLY.to_string()
        }
    }
}

fn reply_from_upstream_error(err: UpstreamError) -> String {
    match err {
        err if err.is_rate_limited() => {
            warn!("Upstream rate limit hit");
            RATE_LIMIT_REPLY.to_string()
        }
        UpstreamError::Http { status, body } => {
            let message = upstream_error_message(&body);
            warn!(status, %message, "Upstream request rejected");
            format!("{} {}: {}", UPSTREAM_ERROR_PREFIX, status, message)
        }
        UpstreamError::Network(e) => {
            warn!(error = %e, timeout = e.is_timeout(), "Upstream unreachable");
            BACKEND_ERROR_REPLY.to_string()
        }
    }
}

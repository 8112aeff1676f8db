// System prompt assembly
//
// Combines the persona, a language instruction, a bounded lyric excerpt and an
// optional locale-specific example into one system prompt. The random source
// is passed in so sampling can be seeded.

use rand::seq::SliceRandom;
use rand::Rng;
use std::sync::Arc;

use super::corpus::LyricCorpus;
use super::language::detect_language;
use super::system_prompt::{few_shot_example, language_instruction, LYRICS_HEADER, PERSONA};

/// How many songs go into a prompt, and which ones
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExcerptStrategy {
    /// The first n songs in corpus order
    First(usize),
    /// A uniform random sample of k songs
    Random(usize),
}

impl ExcerptStrategy {
    pub fn size(&self) -> usize {
        match self {
            Self::First(n) | Self::Random(n) => *n,
        }
    }
}

/// Whether the excerpt is drawn per request or pinned once at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplingMode {
    PerRequest,
    Startup,
}

/// Per-request inputs to the system prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptContext {
    pub detected_language: String,
    pub lyrics_excerpt: String,
}

pub struct PromptBuilder {
    corpus: Arc<LyricCorpus>,
    strategy: ExcerptStrategy,
}

impl PromptBuilder {
    pub fn new(corpus: Arc<LyricCorpus>, strategy: ExcerptStrategy) -> Self {
        Self { corpus, strategy }
    }

    /// Newline-joined lyrics of the selected songs.
    /// Non-empty whenever the corpus is non-empty (blank songs are dropped at load).
    pub fn select_excerpt<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        let songs = self.corpus.songs();
        let selected: Vec<&str> = match self.strategy {
            ExcerptStrategy::First(n) => songs.iter().take(n).map(|s| s.content.as_str()).collect(),
            ExcerptStrategy::Random(k) => songs
                .choose_multiple(rng, k)
                .map(|s| s.content.as_str())
                .collect(),
        };
        selected.join("\n")
    }

    pub fn context<R: Rng + ?Sized>(&self, user_message: &str, rng: &mut R) -> PromptContext {
        PromptContext {
            detected_language: detect_language(user_message),
            lyrics_excerpt: self.select_excerpt(rng),
        }
    }

    /// Same as `context` but with a pre-selected excerpt
    pub fn context_with_excerpt(&self, user_message: &str, excerpt: &str) -> PromptContext {
        PromptContext {
            detected_language: detect_language(user_message),
            lyrics_excerpt: excerpt.to_string(),
        }
    }

    pub fn build<R: Rng + ?Sized>(&self, user_message: &str, rng: &mut R) -> String {
        render(&self.context(user_message, rng))
    }
}

/// Render the final system prompt text
pub fn render(context: &PromptContext) -> String {
    let mut sections = vec![
        PERSONA.to_string(),
        language_instruction(&context.detected_language),
    ];

    if !context.lyrics_excerpt.is_empty() {
        sections.push(format!("{}\n{}", LYRICS_HEADER, context.lyrics_excerpt));
    }

    if let Some(example) = few_shot_example(&context.detected_language) {
        sections.push(example.to_string());
    }

    sections.join("\n\n")
}

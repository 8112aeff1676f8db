// AI module: everything between a user message and the model's reply
//
// This module provides:
// - Lyric corpus loading
// - Language detection with a safe default
// - System prompt assembly from persona, language and lyric excerpt
// - Groq chat-completions client behind the CompletionApi seam
// - Typed reply extraction from completion bodies

pub mod corpus;
pub mod groq_client;
pub mod language;
pub mod prompt_builder;
pub mod response;
pub mod system_prompt;

// Re-export commonly used types
pub use corpus::{LyricCorpus, Song};
pub use groq_client::{CompletionApi, GroqClient, Message};
pub use language::{detect_language, DEFAULT_LANGUAGE};
pub use prompt_builder::{ExcerptStrategy, PromptBuilder, PromptContext, SamplingMode};
pub use response::{extract_reply, upstream_error_message};

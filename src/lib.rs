// Modules
pub mod ai;
pub mod config;
pub mod error;
pub mod relay;
pub mod server;

pub use config::{Args, RelayConfig};
pub use error::RelayError;
pub use relay::{ChatRelay, ChatReply, ChatRequest};

use std::sync::Arc;

use ai::{GroqClient, LyricCorpus};

/// Load the corpus, build the Groq client and serve until shutdown
pub async fn run(config: RelayConfig) -> Result<(), RelayError> {
    tracing::info!(?config, "Starting lyric relay");

    let corpus = Arc::new(LyricCorpus::load(&config.lyrics_path)?);
    if corpus.is_empty() {
        tracing::warn!("Lyric corpus is empty, prompts will carry no lyrics");
    }

    let upstream = Arc::new(GroqClient::new(&config)?);
    let relay = ChatRelay::new(&config, corpus, upstream);

    server::serve(relay, config.port).await
}

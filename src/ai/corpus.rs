// Lyric corpus loading
//
// The corpus is a static JSON document: {"songs":[{"content": "...", ...}]}.
// It is read once at startup and shared read-only for the process lifetime.

use serde::Deserialize;
use std::path::Path;
use tracing::{info, warn};

use crate::error::CorpusError;

/// A single song; only `content` is required, extra fields are ignored
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Song {
    pub content: String,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LyricsDocument {
    songs: Vec<Song>,
}

/// Ordered, immutable collection of songs
#[derive(Debug, Clone, Default)]
pub struct LyricCorpus {
    songs: Vec<Song>,
}

impl LyricCorpus {
    /// Build a corpus, dropping songs with blank lyrics
    pub fn new(songs: Vec<Song>) -> Self {
        let total = songs.len();
        let songs: Vec<Song> = songs
            .into_iter()
            .filter(|song| !song.content.trim().is_empty())
            .collect();

        if songs.len() < total {
            warn!(
                dropped = total - songs.len(),
                "Ignoring songs with empty lyrics"
            );
        }

        Self { songs }
    }

    pub fn from_json(json: &str) -> Result<Self, CorpusError> {
        let document: LyricsDocument = serde_json::from_str(json)?;
        Ok(Self::new(document.songs))
    }

    pub fn load(path: &Path) -> Result<Self, CorpusError> {
        let json = std::fs::read_to_string(path).map_err(|source| CorpusError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let corpus = Self::from_json(&json)?;
        info!(songs = corpus.len(), path = %path.display(), "Loaded lyric corpus");
        Ok(corpus)
    }

    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }
}

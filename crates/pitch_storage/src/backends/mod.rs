pub mod memory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use memory::{InMemoryStorage, MemoryConfig};

#[cfg(feature = "sqlite")]
pub use sqlite::{SQLiteStorage, SqliteConfig};

use pitch_core::{ArticleMatch, Error, Result};
use std::cmp::Ordering;

/// Orders matches most similar first and keeps the first `limit`.
pub(crate) fn rank_matches(mut matches: Vec<ArticleMatch>, limit: usize) -> Vec<ArticleMatch> {
    matches.sort_by(|a, b| b.similarity.partial_cmp(&a.similarity).unwrap_or(Ordering::Equal));
    matches.truncate(limit);
    matches
}

pub(crate) fn score(query: &[f32], embedding: &[f32]) -> Result<f64> {
    pitch_core::vector::cosine_similarity(query, embedding)
        .map_err(|e| Error::Storage(format!("Failed to score article: {}", e)))
}

pub mod embeddings;
pub mod models;

/// Dimension of `text-embedding-3-small` vectors.
pub const DEFAULT_DIMENSIONS: usize = 1536;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: Option<String>,
    /// Provider: `openai` or `dummy`.
    pub model_name: Option<String>,
    pub model_url: Option<String>,
    /// Model requested from the provider, e.g. `text-embedding-3-large`.
    pub embedding_model: Option<String>,
    pub dimensions: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model_name: None,
            model_url: None,
            embedding_model: None,
            dimensions: DEFAULT_DIMENSIONS,
        }
    }
}

pub mod prelude {
    pub use super::embeddings::EmbeddingGenerator;
    pub use super::models::create_model;
    pub use super::Config;
    pub use pitch_core::{EmbeddingModel, Error, Result};
}

pub use embeddings::EmbeddingGenerator;
pub use models::create_model;

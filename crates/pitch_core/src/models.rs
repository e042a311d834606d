use async_trait::async_trait;
use std::fmt;
use crate::types::ContactInfo;
use crate::Result;

#[async_trait]
pub trait EmbeddingModel: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// Largest number of inputs accepted by a single `embed_batch` call
    fn max_batch_size(&self) -> usize;

    /// Generate an embedding for a piece of text
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embeddings for several texts, one vector per input, in order
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}

/// Looks up contact details for a reporter by byline and outlet.
#[async_trait]
pub trait ContactEnricher: Send + Sync {
    fn name(&self) -> &str;

    async fn enrich(&self, name: &str, outlet: &str) -> Result<ContactInfo>;
}

use pitch_core::vector::blend;
use pitch_core::{Article, EmbeddingModel, Error, Result};
use std::sync::Arc;
use tracing::debug;

/// Weight given to refinement text when blending it into a brief's vector.
pub const DEFAULT_REFINEMENT_ALPHA: f64 = 0.35;

pub struct EmbeddingGenerator {
    model: Arc<dyn EmbeddingModel>,
}

impl EmbeddingGenerator {
    pub fn new(model: Arc<dyn EmbeddingModel>) -> Self {
        Self { model }
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    pub async fn embed_text(&self, text: &str) -> Result<Vec<f32>> {
        self.model.embed(text).await
    }

    pub async fn embed_article(&self, article: &Article) -> Result<Vec<f32>> {
        self.model.embed(&article.embedding_text()).await
    }

    /// Embeds any number of texts, split into chunks the provider accepts.
    pub async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let chunk_size = self.model.max_batch_size().max(1);
        let mut vectors = Vec::with_capacity(texts.len());

        for chunk in texts.chunks(chunk_size) {
            let embedded = self.model.embed_batch(chunk).await?;
            if embedded.len() != chunk.len() {
                return Err(Error::Embedding(format!(
                    "{} returned {} embeddings for {} inputs",
                    self.model.name(),
                    embedded.len(),
                    chunk.len()
                )));
            }
            vectors.extend(embedded);
        }

        Ok(vectors)
    }

    /// Embeds a brief and, when refinement text is present, blends the
    /// refinement's vector into it with weight `alpha`.
    pub async fn embed_refined(&self, brief: &str, refinement: Option<&str>, alpha: f64) -> Result<Vec<f32>> {
        let Some(refinement) = refinement.filter(|r| !r.trim().is_empty()) else {
            return self.embed_text(brief).await;
        };

        let mut vectors = self.embed_batch(&[brief.to_string(), refinement.to_string()]).await?;
        let refinement_vector = vectors.pop();
        let brief_vector = vectors.pop();
        match (brief_vector, refinement_vector) {
            (Some(brief_vector), Some(refinement_vector)) => {
                debug!(alpha, "blending refinement into brief vector");
                blend(&brief_vector, &refinement_vector, alpha)
            }
            _ => Err(Error::Embedding("Missing embedding for refined brief".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DummyModel;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Default)]
    struct CountingModel {
        batch_calls: AtomicUsize,
    }

    #[async_trait]
    impl EmbeddingModel for CountingModel {
        fn name(&self) -> &str {
            "Counting"
        }

        fn max_batch_size(&self) -> usize {
            3
        }

        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            Ok(vec![text.len() as f32])
        }

        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            assert!(texts.len() <= 3);
            self.batch_calls.fetch_add(1, Ordering::SeqCst);
            Ok(texts.iter().map(|t| vec![t.len() as f32]).collect())
        }
    }

    #[tokio::test]
    async fn test_embed_batch_chunks_input() {
        let model = Arc::new(CountingModel::default());
        let generator = EmbeddingGenerator::new(model.clone());

        let texts: Vec<String> = (0..7).map(|i| "x".repeat(i)).collect();
        let vectors = generator.embed_batch(&texts).await.unwrap();

        assert_eq!(vectors.len(), 7);
        assert_eq!(vectors[6], vec![6.0]);
        assert_eq!(model.batch_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_embed_refined_without_refinement_is_plain_embedding() {
        let generator = EmbeddingGenerator::new(Arc::new(DummyModel::new(64)));
        let plain = generator.embed_text("restaurant robotics").await.unwrap();
        assert_eq!(generator.embed_refined("restaurant robotics", None, 0.35).await.unwrap(), plain);
        assert_eq!(generator.embed_refined("restaurant robotics", Some("  "), 0.35).await.unwrap(), plain);
    }

    #[tokio::test]
    async fn test_embed_refined_moves_toward_refinement() {
        use pitch_core::vector::cosine_similarity;

        let generator = EmbeddingGenerator::new(Arc::new(DummyModel::new(128)));
        let brief = generator.embed_text("restaurant robotics funding").await.unwrap();
        let refinement = generator.embed_text("kitchen automation labor shortage").await.unwrap();
        let refined = generator
            .embed_refined("restaurant robotics funding", Some("kitchen automation labor shortage"), 0.35)
            .await
            .unwrap();

        assert!(cosine_similarity(&refined, &refinement).unwrap() > cosine_similarity(&brief, &refinement).unwrap());
        assert!(cosine_similarity(&refined, &brief).unwrap() > cosine_similarity(&refined, &refinement).unwrap());
    }
}

use async_trait::async_trait;
use crate::query::SimilarityQuery;
use crate::types::{Article, ArticleMatch};
use crate::Result;

/// What happened to an article handed to [`ArticleStorage::store_article`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOutcome {
    Inserted,
    /// An article with the same url is already stored.
    DuplicateUrl,
    /// The url is new but its id belongs to a different stored article.
    DuplicateId,
}

impl StoreOutcome {
    pub fn is_inserted(&self) -> bool {
        matches!(self, StoreOutcome::Inserted)
    }
}

#[async_trait]
pub trait ArticleStorage: Send + Sync {
    /// Store an article unless its url or id is already taken. The stored
    /// copy is never overwritten.
    async fn store_article(&self, article: &Article) -> Result<StoreOutcome>;

    /// Attach an embedding to a stored article
    async fn set_embedding(&self, id: &str, embedding: &[f32]) -> Result<()>;

    /// Articles still waiting for an embedding, oldest first
    async fn pending_embeddings(&self, limit: usize) -> Result<Vec<Article>>;

    /// Nearest neighbours of the query vector that satisfy every predicate,
    /// most similar first, at most `query.limit` rows
    async fn find_similar(&self, query: &SimilarityQuery) -> Result<Vec<ArticleMatch>>;

    /// Number of stored articles
    async fn count(&self) -> Result<usize>;

    /// Release any pooled resources
    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }
}

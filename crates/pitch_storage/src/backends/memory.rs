use async_trait::async_trait;
use pitch_core::{Article, ArticleMatch, ArticleStorage, Error, Result, SimilarityQuery, StoreOutcome};
use std::collections::HashSet;
use std::ops::Deref;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{rank_matches, score};
use crate::{BackendConfig, StorageBackend};

#[derive(Debug, Clone)]
pub struct MemoryConfig {
    pub config: BackendConfig,
}

impl MemoryConfig {
    pub fn new() -> Self {
        Self {
            config: BackendConfig::new("memory://".to_string()),
        }
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for MemoryConfig {
    type Target = BackendConfig;

    fn deref(&self) -> &Self::Target {
        &self.config
    }
}

pub struct MemoryStore {
    articles: Vec<Article>,
    urls: HashSet<String>,
    ids: HashSet<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            articles: Vec::new(),
            urls: HashSet::new(),
            ids: HashSet::new(),
        }
    }

    pub fn store_article(&mut self, article: &Article) -> StoreOutcome {
        if self.urls.contains(&article.url) {
            return StoreOutcome::DuplicateUrl;
        }
        if self.ids.contains(&article.id) {
            return StoreOutcome::DuplicateId;
        }
        self.urls.insert(article.url.clone());
        self.ids.insert(article.id.clone());
        self.articles.push(article.clone());
        StoreOutcome::Inserted
    }

    pub fn set_embedding(&mut self, id: &str, embedding: &[f32]) -> Result<()> {
        let article = self
            .articles
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| Error::Storage(format!("No article with id {}", id)))?;
        article.embedding = Some(embedding.to_vec());
        Ok(())
    }

    pub fn pending_embeddings(&self, limit: usize) -> Vec<Article> {
        self.articles
            .iter()
            .filter(|a| a.embedding.is_none())
            .take(limit)
            .cloned()
            .collect()
    }

    pub fn find_similar(&self, query: &SimilarityQuery) -> Result<Vec<ArticleMatch>> {
        let mut matches = Vec::new();
        for article in self.articles.iter().filter(|a| query.matches(a)) {
            let Some(embedding) = article.embedding.as_deref() else {
                continue;
            };
            matches.push(ArticleMatch::from_article(article, score(&query.vector, embedding)?));
        }
        Ok(rank_matches(matches, query.limit))
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Process-local store; exact cosine search over every stored row.
pub struct InMemoryStorage {
    store: Arc<RwLock<MemoryStore>>,
    config: MemoryConfig,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(MemoryStore::new())),
            config: MemoryConfig::new(),
        }
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StorageBackend for InMemoryStorage {
    fn get_error_message() -> &'static str {
        "Memory storage should be available"
    }

    async fn initialize(config: &BackendConfig) -> Result<Self> {
        Ok(Self {
            store: Arc::new(RwLock::new(MemoryStore::new())),
            config: MemoryConfig { config: config.clone() },
        })
    }
}

#[async_trait]
impl ArticleStorage for InMemoryStorage {
    async fn store_article(&self, article: &Article) -> Result<StoreOutcome> {
        let mut store = self.store.write().await;
        Ok(store.store_article(article))
    }

    async fn set_embedding(&self, id: &str, embedding: &[f32]) -> Result<()> {
        let mut store = self.store.write().await;
        store.set_embedding(id, embedding)
    }

    async fn pending_embeddings(&self, limit: usize) -> Result<Vec<Article>> {
        let store = self.store.read().await;
        Ok(store.pending_embeddings(limit))
    }

    async fn find_similar(&self, query: &SimilarityQuery) -> Result<Vec<ArticleMatch>> {
        let store = self.store.read().await;
        store.find_similar(query)
    }

    async fn count(&self) -> Result<usize> {
        let store = self.store.read().await;
        Ok(store.len())
    }
}

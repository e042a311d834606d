use chrono::{DateTime, Utc};
use pitch_core::{classify_outlet, classify_region, Article, ArticleStorage, Error, OutletType, Region, Result, StoreOutcome};
use pitch_inference::EmbeddingGenerator;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// One entry of a seed file. Classification and ids are optional and filled
/// in on import.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedArticle {
    #[serde(default)]
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub author: Option<String>,
    pub outlet: String,
    #[serde(default)]
    pub outlet_type: Option<OutletType>,
    #[serde(default)]
    pub geography: Option<Region>,
    #[serde(default)]
    pub section: Option<String>,
    pub url: String,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub embedding: Option<Vec<f32>>,
}

impl From<SeedArticle> for Article {
    fn from(seed: SeedArticle) -> Self {
        let outlet_type = seed.outlet_type.unwrap_or_else(|| classify_outlet(&seed.outlet));
        let geography = seed.geography.unwrap_or_else(|| classify_region(&seed.outlet));
        Article {
            id: seed.id.filter(|id| !id.is_empty()).unwrap_or_else(|| Uuid::new_v4().to_string()),
            title: seed.title,
            author: seed.author.filter(|a| !a.trim().is_empty()),
            outlet: seed.outlet,
            outlet_type: Some(outlet_type),
            geography: Some(geography),
            section: seed.section,
            url: seed.url,
            published_at: seed.published_at,
            summary: seed.summary,
            embedding: seed.embedding,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportReport {
    pub inserted: usize,
    /// Url already stored.
    pub skipped: usize,
    /// New url whose id is already used by another article.
    pub id_conflicts: usize,
}

pub async fn read_seed_file(path: &Path) -> Result<Vec<Article>> {
    let raw = tokio::fs::read_to_string(path).await?;
    let seeds: Vec<SeedArticle> = serde_json::from_str(&raw)?;
    Ok(seeds.into_iter().map(Article::from).collect())
}

/// Stores every article whose url and id are not already taken.
pub async fn import_articles(storage: &dyn ArticleStorage, articles: &[Article]) -> Result<ImportReport> {
    let mut report = ImportReport::default();
    for article in articles {
        match storage.store_article(article).await? {
            StoreOutcome::Inserted => report.inserted += 1,
            StoreOutcome::DuplicateUrl => {
                debug!(url = %article.url, "skipping known url");
                report.skipped += 1;
            }
            StoreOutcome::DuplicateId => {
                warn!(id = %article.id, url = %article.url, "id already used by another article, not imported");
                report.id_conflicts += 1;
            }
        }
    }
    info!(
        inserted = report.inserted,
        skipped = report.skipped,
        id_conflicts = report.id_conflicts,
        "import finished"
    );
    Ok(report)
}

/// Embeds stored articles that have no vector yet, `batch_size` at a time.
/// Returns how many were embedded.
pub async fn backfill_embeddings(
    storage: &dyn ArticleStorage,
    embeddings: &EmbeddingGenerator,
    batch_size: usize,
) -> Result<usize> {
    let batch_size = batch_size.max(1);
    let mut embedded = 0;
    let mut done: HashSet<String> = HashSet::new();

    loop {
        let pending = storage.pending_embeddings(batch_size).await?;
        if pending.is_empty() {
            break;
        }
        if let Some(stuck) = pending.iter().find(|a| done.contains(&a.id)) {
            return Err(Error::Storage(format!(
                "Article {} ({}) is still pending after its embedding was stored",
                stuck.id, stuck.url
            )));
        }

        let texts: Vec<String> = pending.iter().map(Article::embedding_text).collect();
        let vectors = embeddings.embed_batch(&texts).await?;
        for (article, vector) in pending.iter().zip(vectors) {
            storage.set_embedding(&article.id, &vector).await?;
            done.insert(article.id.clone());
        }

        embedded += pending.len();
        info!(batch = pending.len(), total = embedded, model = embeddings.model_name(), "embedded articles");
    }

    if embedded == 0 {
        warn!("no articles were waiting for embeddings");
    }
    Ok(embedded)
}

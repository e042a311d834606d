use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pitch_core::{Article, ArticleMatch, ArticleStorage, Error, Predicate, Result, SimilarityQuery, StoreOutcome};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqliteRow};
use sqlx::Row;
use std::ops::Deref;
use std::str::FromStr;
use tracing::debug;

use super::{rank_matches, score};
use crate::{BackendConfig, StorageBackend};

const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS articles (
        id TEXT PRIMARY KEY,
        title TEXT NOT NULL,
        author TEXT,
        outlet TEXT NOT NULL,
        outlet_type TEXT,
        geography TEXT,
        section TEXT,
        url TEXT NOT NULL UNIQUE,
        published_at TEXT,
        summary TEXT,
        embedding TEXT,
        created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_articles_outlet_type ON articles (outlet_type)",
    "CREATE INDEX IF NOT EXISTS idx_articles_geography ON articles (geography)",
];

const COLUMNS: &str = "id, title, author, outlet, outlet_type, geography, section, url, published_at, summary, embedding";

#[derive(Debug, Clone)]
pub struct SqliteConfig {
    pub config: BackendConfig,
}

impl SqliteConfig {
    pub fn new() -> Self {
        Self {
            config: BackendConfig::new("sqlite:articles.db".to_string()),
        }
    }
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for SqliteConfig {
    type Target = BackendConfig;

    fn deref(&self) -> &Self::Target {
        &self.config
    }
}

pub struct SQLiteStorage {
    pool: SqlitePool,
}

#[async_trait]
impl StorageBackend for SQLiteStorage {
    fn get_error_message() -> &'static str {
        "SQLite database should be writable at the configured path"
    }

    async fn initialize(config: &BackendConfig) -> Result<Self> {
        Self::connect(&config.url).await
    }
}

impl SQLiteStorage {
    /// Opens (creating if needed) the database at `url`, which may be a
    /// `sqlite:` url or a plain file path.
    pub async fn connect(url: &str) -> Result<Self> {
        let url = if url.starts_with("sqlite:") {
            url.to_string()
        } else {
            format!("sqlite:{}", url)
        };

        let options = SqliteConnectOptions::from_str(&url)
            .map_err(|e| Error::Database(format!("Invalid database url {}: {}", url, e)))?
            .create_if_missing(true);

        let pool = SqlitePool::connect_with(options)
            .await
            .map_err(|e| Error::Database(format!("Failed to connect to database: {}", e)))?;

        for (i, migration) in MIGRATIONS.iter().enumerate() {
            sqlx::query(migration)
                .execute(&pool)
                .await
                .map_err(|e| Error::Database(format!("Failed to run migration {}: {}", i, e)))?;
        }

        Ok(Self { pool })
    }
}

/// Compiles predicates into a `WHERE` body and its positional parameters.
fn compile_predicates(predicates: &[Predicate]) -> (String, Vec<String>) {
    let mut clauses = Vec::with_capacity(predicates.len());
    let mut params = Vec::new();

    for predicate in predicates {
        let (column, values): (&str, Vec<&str>) = match predicate {
            Predicate::HasEmbedding => {
                clauses.push("embedding IS NOT NULL".to_string());
                continue;
            }
            Predicate::HasAuthor => {
                clauses.push("author IS NOT NULL".to_string());
                continue;
            }
            Predicate::OutletTypeIn(kinds) => ("outlet_type", kinds.iter().map(|k| k.as_str()).collect()),
            Predicate::RegionIn(regions) => ("geography", regions.iter().map(|r| r.as_str()).collect()),
        };

        if values.is_empty() {
            clauses.push("0 = 1".to_string());
            continue;
        }
        let placeholders = vec!["?"; values.len()].join(", ");
        clauses.push(format!("{} IN ({})", column, placeholders));
        params.extend(values.into_iter().map(str::to_string));
    }

    if clauses.is_empty() {
        clauses.push("1 = 1".to_string());
    }
    (clauses.join(" AND "), params)
}

fn parse_optional<T: FromStr>(row: &SqliteRow, column: &str) -> Result<Option<T>>
where
    T::Err: std::fmt::Display,
{
    let raw: Option<String> = row
        .try_get(column)
        .map_err(|e| Error::Database(format!("Failed to read {}: {}", column, e)))?;
    raw.map(|v| {
        v.parse::<T>()
            .map_err(|e| Error::Database(format!("Bad value for {}: {}", column, e)))
    })
    .transpose()
}

fn article_from_row(row: &SqliteRow) -> Result<Article> {
    let get = |column: &str| -> Result<Option<String>> {
        row.try_get(column)
            .map_err(|e| Error::Database(format!("Failed to read {}: {}", column, e)))
    };
    let required = |column: &str| -> Result<String> {
        get(column)?.ok_or_else(|| Error::Database(format!("Column {} is null", column)))
    };

    let published_at = get("published_at")?
        .map(|v| {
            DateTime::parse_from_rfc3339(&v)
                .map(|d| d.with_timezone(&Utc))
                .map_err(|e| Error::Database(format!("Failed to parse date: {}", e)))
        })
        .transpose()?;

    let embedding = get("embedding")?
        .map(|v| serde_json::from_str::<Vec<f32>>(&v))
        .transpose()?;

    Ok(Article {
        id: required("id")?,
        title: required("title")?,
        author: get("author")?,
        outlet: required("outlet")?,
        outlet_type: parse_optional(row, "outlet_type")?,
        geography: parse_optional(row, "geography")?,
        section: get("section")?,
        url: required("url")?,
        published_at,
        summary: get("summary")?,
        embedding,
    })
}

#[async_trait]
impl ArticleStorage for SQLiteStorage {
    async fn store_article(&self, article: &Article) -> Result<StoreOutcome> {
        let embedding = article.embedding.as_ref().map(serde_json::to_string).transpose()?;

        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO articles
            (id, title, author, outlet, outlet_type, geography, section, url, published_at, summary, embedding)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&article.id)
        .bind(&article.title)
        .bind(article.author.as_deref())
        .bind(&article.outlet)
        .bind(article.outlet_type.map(|t| t.as_str()))
        .bind(article.geography.map(|r| r.as_str()))
        .bind(article.section.as_deref())
        .bind(&article.url)
        .bind(article.published_at.map(|d| d.to_rfc3339()))
        .bind(article.summary.as_deref())
        .bind(embedding)
        .execute(&self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to store article: {}", e)))?;

        if result.rows_affected() == 1 {
            return Ok(StoreOutcome::Inserted);
        }

        // Ignored by either the url or the id constraint.
        let url_taken = sqlx::query("SELECT 1 FROM articles WHERE url = ?")
            .bind(&article.url)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Error::Database(format!("Failed to check article url: {}", e)))?
            .is_some();
        Ok(if url_taken {
            StoreOutcome::DuplicateUrl
        } else {
            StoreOutcome::DuplicateId
        })
    }

    async fn set_embedding(&self, id: &str, embedding: &[f32]) -> Result<()> {
        let result = sqlx::query("UPDATE articles SET embedding = ? WHERE id = ?")
            .bind(serde_json::to_string(embedding)?)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| Error::Database(format!("Failed to update embedding: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(Error::Storage(format!("No article with id {}", id)));
        }
        Ok(())
    }

    async fn pending_embeddings(&self, limit: usize) -> Result<Vec<Article>> {
        let sql = format!("SELECT {} FROM articles WHERE embedding IS NULL ORDER BY rowid LIMIT ?", COLUMNS);
        let rows = sqlx::query(&sql)
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| Error::Database(format!("Failed to load pending articles: {}", e)))?;

        rows.iter().map(article_from_row).collect()
    }

    async fn find_similar(&self, query: &SimilarityQuery) -> Result<Vec<ArticleMatch>> {
        let (conditions, params) = compile_predicates(&query.predicates);
        let sql = format!("SELECT {} FROM articles WHERE {}", COLUMNS, conditions);
        debug!(%sql, params = params.len(), "similarity query");

        let mut statement = sqlx::query(&sql);
        for param in params {
            statement = statement.bind(param);
        }
        let rows = statement
            .fetch_all(&self.pool)
            .await
            .map_err(|e| Error::Database(format!("Failed to find similar articles: {}", e)))?;

        let mut matches = Vec::with_capacity(rows.len());
        for row in &rows {
            let article = article_from_row(row)?;
            if !query.matches(&article) {
                continue;
            }
            if let Some(embedding) = article.embedding.as_deref() {
                let similarity = score(&query.vector, embedding)?;
                matches.push(ArticleMatch::from_article(&article, similarity));
            }
        }
        Ok(rank_matches(matches, query.limit))
    }

    async fn count(&self) -> Result<usize> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM articles")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| Error::Database(format!("Failed to count articles: {}", e)))?;
        let n: i64 = row
            .try_get("n")
            .map_err(|e| Error::Database(format!("Failed to read count: {}", e)))?;
        Ok(n as usize)
    }

    async fn shutdown(&self) -> Result<()> {
        self.pool.close().await;
        Ok(())
    }
}

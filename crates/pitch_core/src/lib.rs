pub mod classify;
pub mod error;
pub mod models;
pub mod query;
pub mod storage;
pub mod types;
pub mod vector;

pub use classify::{classify_outlet, classify_region};
pub use error::{Error, Result};
pub use models::{ContactEnricher, EmbeddingModel};
pub use query::{expand_geography, Predicate, QueryBuilder, SimilarityQuery, CANDIDATE_POOL};
pub use storage::{ArticleStorage, StoreOutcome};
pub use types::{Article, ArticleMatch, ContactInfo, GeographyFilter, OutletType, Region};

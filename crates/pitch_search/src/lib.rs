//! Matching story briefs to the reporters who have been writing about them.

pub mod brief;
pub mod enrichment;
pub mod justification;
pub mod ranking;
pub mod service;
pub mod types;

pub mod prelude {
    pub use super::enrichment::MockContactEnricher;
    pub use super::ranking::{RankingWeights, ReporterRanker};
    pub use super::service::{SearchOptions, SearchService};
    pub use super::types::{RankedReporter, Reporter, ReporterArticle, SearchRequest, SearchResponse};
    pub use pitch_core::{Error, Result};
}

pub use enrichment::MockContactEnricher;
pub use ranking::{RankingWeights, ReporterRanker, ScoredReporter};
pub use service::{SearchOptions, SearchService};
pub use types::{RankedReporter, Reporter, ReporterArticle, SearchRequest, SearchResponse};

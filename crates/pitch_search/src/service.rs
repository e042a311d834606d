use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use pitch_core::{ArticleStorage, ContactEnricher, ContactInfo, EmbeddingModel, Error, QueryBuilder, Result, CANDIDATE_POOL};
use pitch_inference::embeddings::{EmbeddingGenerator, DEFAULT_REFINEMENT_ALPHA};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::brief::{enrich_brief, refinement_text};
use crate::ranking::{RankingWeights, ReporterRanker, ScoredReporter, DEFAULT_TOP_N};
use crate::types::{RankedReporter, SearchRequest, SearchResponse};

#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub weights: RankingWeights,
    /// Nearest neighbours fetched before grouping by reporter.
    pub candidate_pool: usize,
    pub top_n: usize,
    /// Weight of refinement text when blending it into the brief vector.
    pub refinement_alpha: f64,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            weights: RankingWeights::default(),
            candidate_pool: CANDIDATE_POOL,
            top_n: DEFAULT_TOP_N,
            refinement_alpha: DEFAULT_REFINEMENT_ALPHA,
        }
    }
}

/// Brief in, ranked reporters out.
///
/// Holds shared handles to the embedding model, the article store and the
/// contact enricher; one instance serves every request.
pub struct SearchService {
    embeddings: EmbeddingGenerator,
    storage: Arc<dyn ArticleStorage>,
    enricher: Arc<dyn ContactEnricher>,
    options: SearchOptions,
}

impl fmt::Debug for SearchService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchService")
            .field("model", &self.embeddings.model_name())
            .field("storage", &"<dyn ArticleStorage>")
            .field("enricher", &self.enricher.name())
            .field("options", &self.options)
            .finish()
    }
}

impl SearchService {
    pub fn new(
        model: Arc<dyn EmbeddingModel>,
        storage: Arc<dyn ArticleStorage>,
        enricher: Arc<dyn ContactEnricher>,
    ) -> Self {
        Self {
            embeddings: EmbeddingGenerator::new(model),
            storage,
            enricher,
            options: SearchOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SearchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResponse> {
        self.search_at(request, Utc::now()).await
    }

    /// Runs a search with recency measured from `now`.
    pub async fn search_at(&self, request: &SearchRequest, now: DateTime<Utc>) -> Result<SearchResponse> {
        request.validate()?;

        let brief = enrich_brief(
            &request.brief,
            request.focus_publications.as_deref(),
            request.competitors.as_deref(),
        );
        let refinement = refinement_text(&request.refinements);

        let vector = self
            .embeddings
            .embed_refined(&brief, refinement.as_deref(), self.options.refinement_alpha)
            .await
            .map_err(|e| {
                warn!(error = %e, model = self.embeddings.model_name(), "embedding step failed");
                e.into_embedding()
            })?;

        let query = QueryBuilder::new(vector)
            .outlet_types(&request.outlet_types)
            .geography(&request.geography)
            .limit(self.options.candidate_pool)
            .build();
        debug!(predicates = ?query.predicates, limit = query.limit, "querying article store");

        let matches = self.storage.find_similar(&query).await.map_err(|e| {
            error!(error = %e, "article store query failed");
            e
        })?;
        if matches.is_empty() {
            info!("no candidate articles for brief");
            return Ok(SearchResponse::empty());
        }
        let candidates = matches.len();

        let ranker = ReporterRanker::new(self.options.weights, self.options.top_n);
        let ranked = ranker.rank(matches, &request.outlet_types, now);

        let contacts = join_all(ranked.iter().map(|r| self.contact_for(r))).await;
        let reporters: Vec<RankedReporter> = ranked
            .iter()
            .zip(contacts)
            .map(|(scored, contact)| RankedReporter::new(scored, contact))
            .collect();

        info!(candidates, reporters = reporters.len(), "search complete");
        Ok(SearchResponse::new(reporters))
    }

    /// Contact lookup for one reporter; a failure only blanks that reporter's fields.
    async fn contact_for(&self, reporter: &ScoredReporter) -> ContactInfo {
        match self.enricher.enrich(&reporter.name, &reporter.outlet).await {
            Ok(contact) => contact,
            Err(e) => {
                warn!(reporter = %reporter.name, outlet = %reporter.outlet, error = %e, "contact enrichment failed");
                ContactInfo::default()
            }
        }
    }

    pub async fn shutdown(&self) -> Result<()> {
        self.storage.shutdown().await
    }
}

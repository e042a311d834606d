//! Reporter ranking.
//!
//! Article matches are grouped by their exact `(author, outlet)` byline and
//! each group is scored as a weighted sum of three sub-scores in `[0, 1]`:
//! mean similarity, best recency and outlet relevance.

use chrono::{DateTime, Utc};
use pitch_core::{ArticleMatch, OutletType};
use std::cmp::Ordering;
use std::collections::HashMap;

pub const DEFAULT_TOP_N: usize = 15;

/// Supporting articles kept per reporter.
pub const EVIDENCE_LIMIT: usize = 3;

const FRESH_DAYS: f64 = 90.0;
const RECENT_DAYS: f64 = 180.0;
const MISMATCHED_OUTLET: f64 = 0.3;

/// Composite score weights. They should sum to 1.0 so scores stay in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankingWeights {
    pub similarity: f64,
    pub recency: f64,
    pub outlet_relevance: f64,
}

impl Default for RankingWeights {
    fn default() -> Self {
        Self {
            similarity: 0.5,
            recency: 0.3,
            outlet_relevance: 0.2,
        }
    }
}

/// Identity of a reporter: the byline and outlet exactly as printed.
/// Byline variants of one person stay separate reporters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReporterKey {
    pub author: String,
    pub outlet: String,
}

#[derive(Debug, Clone)]
pub struct ScoredReporter {
    pub name: String,
    pub outlet: String,
    pub outlet_type: Option<OutletType>,
    pub score: f64,
    pub similarity_score: f64,
    pub recency_score: f64,
    pub outlet_relevance_score: f64,
    /// Best matches first, at most [`EVIDENCE_LIMIT`].
    pub articles: Vec<ArticleMatch>,
}

pub fn recency_score(published_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> f64 {
    let Some(published_at) = published_at else {
        return 0.2;
    };

    let days_ago = (now - published_at).num_seconds() as f64 / 86_400.0;
    if days_ago <= FRESH_DAYS {
        1.0
    } else if days_ago <= RECENT_DAYS {
        0.5
    } else {
        0.2
    }
}

pub fn outlet_relevance_score(outlet_type: Option<OutletType>, selected: &[OutletType]) -> f64 {
    if selected.is_empty() {
        return 1.0;
    }
    match outlet_type {
        Some(kind) if selected.contains(&kind) => 1.0,
        _ => MISMATCHED_OUTLET,
    }
}

#[derive(Debug, Clone)]
pub struct ReporterRanker {
    weights: RankingWeights,
    top_n: usize,
}

impl Default for ReporterRanker {
    fn default() -> Self {
        Self::new(RankingWeights::default(), DEFAULT_TOP_N)
    }
}

impl ReporterRanker {
    pub fn new(weights: RankingWeights, top_n: usize) -> Self {
        Self { weights, top_n }
    }

    /// Groups matches by reporter, scores each group and returns the best
    /// `top_n`, highest score first. Equal scores order by name, then outlet.
    pub fn rank(&self, matches: Vec<ArticleMatch>, selected: &[OutletType], now: DateTime<Utc>) -> Vec<ScoredReporter> {
        let mut scored: Vec<ScoredReporter> = group_by_reporter(matches)
            .into_iter()
            .map(|(key, articles)| self.score_group(key, articles, selected, now))
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.name.cmp(&b.name))
                .then_with(|| a.outlet.cmp(&b.outlet))
        });
        scored.truncate(self.top_n);
        scored
    }

    fn score_group(
        &self,
        key: ReporterKey,
        mut articles: Vec<ArticleMatch>,
        selected: &[OutletType],
        now: DateTime<Utc>,
    ) -> ScoredReporter {
        let similarity_score = articles.iter().map(|a| a.similarity).sum::<f64>() / articles.len() as f64;
        let recency_score = articles
            .iter()
            .map(|a| recency_score(a.published_at, now))
            .fold(0.0, f64::max);
        let outlet_type = articles.first().and_then(|a| a.outlet_type);
        let outlet_relevance_score = outlet_relevance_score(outlet_type, selected);

        let score = self.weights.similarity * similarity_score
            + self.weights.recency * recency_score
            + self.weights.outlet_relevance * outlet_relevance_score;

        articles.sort_by(|a, b| b.similarity.partial_cmp(&a.similarity).unwrap_or(Ordering::Equal));
        articles.truncate(EVIDENCE_LIMIT);

        ScoredReporter {
            name: key.author,
            outlet: key.outlet,
            outlet_type,
            score,
            similarity_score,
            recency_score,
            outlet_relevance_score,
            articles,
        }
    }
}

/// Groups matches by byline in first-seen order. Matches without an author
/// cannot be attributed and are dropped.
fn group_by_reporter(matches: Vec<ArticleMatch>) -> Vec<(ReporterKey, Vec<ArticleMatch>)> {
    let mut index: HashMap<ReporterKey, usize> = HashMap::new();
    let mut groups: Vec<(ReporterKey, Vec<ArticleMatch>)> = Vec::new();

    for article in matches {
        let Some(author) = article.author.clone() else {
            continue;
        };
        let key = ReporterKey {
            author,
            outlet: article.outlet.clone(),
        };
        match index.get(&key) {
            Some(&slot) => groups[slot].1.push(article),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push((key, vec![article]));
            }
        }
    }

    groups
}

/// Rounds half up to `decimals` places.
pub fn round_half_up(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor + 0.5).floor() / factor
}

use chrono::{DateTime, Utc};
use pitch_core::{ArticleMatch, ContactInfo, Error, GeographyFilter, OutletType, Result};
use serde::{Deserialize, Serialize};

use crate::justification::build_justification;
use crate::ranking::{round_half_up, ScoredReporter};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub brief: String,
    #[serde(default)]
    pub outlet_types: Vec<OutletType>,
    #[serde(default)]
    pub geography: Vec<GeographyFilter>,
    #[serde(default)]
    pub focus_publications: Option<String>,
    #[serde(default)]
    pub competitors: Option<String>,
    /// Follow-up instructions accumulated over a conversation, oldest first.
    #[serde(default)]
    pub refinements: Vec<String>,
}

impl SearchRequest {
    pub fn new(brief: impl Into<String>) -> Self {
        Self {
            brief: brief.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.brief.trim().is_empty() {
            return Err(Error::validation("brief is required and must be a non-empty string"));
        }
        Ok(())
    }
}

/// Reporter as exposed to clients. `id`, `title` and `beat` are reserved
/// for a reporter directory and are always empty for now.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reporter {
    pub id: String,
    pub name: String,
    pub outlet: String,
    pub title: Option<String>,
    pub beat: Option<String>,
    pub email: Option<String>,
    pub email_confidence: Option<f64>,
    pub linkedin_url: Option<String>,
    pub twitter_handle: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReporterArticle {
    pub title: String,
    pub url: String,
    pub published_at: Option<DateTime<Utc>>,
    pub similarity: f64,
}

impl From<&ArticleMatch> for ReporterArticle {
    fn from(article: &ArticleMatch) -> Self {
        Self {
            title: article.title.clone(),
            url: article.url.clone(),
            published_at: article.published_at,
            similarity: round_half_up(article.similarity, 3),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedReporter {
    pub reporter: Reporter,
    pub score: f64,
    pub justification: String,
    pub articles: Vec<ReporterArticle>,
}

impl RankedReporter {
    pub fn new(scored: &ScoredReporter, contact: ContactInfo) -> Self {
        Self {
            reporter: Reporter {
                id: String::new(),
                name: scored.name.clone(),
                outlet: scored.outlet.clone(),
                title: None,
                beat: None,
                email: contact.email,
                email_confidence: contact.email_confidence,
                linkedin_url: contact.linkedin_url,
                twitter_handle: contact.twitter_handle,
            },
            score: round_half_up(scored.score, 3),
            justification: build_justification(&scored.name, &scored.articles, scored.score),
            articles: scored.articles.iter().map(ReporterArticle::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub reporters: Vec<RankedReporter>,
    pub total: usize,
}

impl SearchResponse {
    pub fn new(reporters: Vec<RankedReporter>) -> Self {
        let total = reporters.len();
        Self { reporters, total }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

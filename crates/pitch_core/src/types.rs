use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: String,
    pub title: String,
    pub author: Option<String>,
    pub outlet: String,
    pub outlet_type: Option<OutletType>,
    pub geography: Option<Region>,
    pub section: Option<String>,
    pub url: String,
    pub published_at: Option<DateTime<Utc>>,
    pub summary: Option<String>,
    pub embedding: Option<Vec<f32>>,
}

impl Article {
    /// Text fed to the embedding model for this article.
    pub fn embedding_text(&self) -> String {
        format!("{}. {}", self.title, self.summary.as_deref().unwrap_or_default())
    }
}

/// An article returned by a similarity query, scored against the query vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleMatch {
    pub id: String,
    pub title: String,
    pub author: Option<String>,
    pub outlet: String,
    pub outlet_type: Option<OutletType>,
    pub url: String,
    pub published_at: Option<DateTime<Utc>>,
    pub summary: Option<String>,
    pub similarity: f64,
}

impl ArticleMatch {
    pub fn from_article(article: &Article, similarity: f64) -> Self {
        Self {
            id: article.id.clone(),
            title: article.title.clone(),
            author: article.author.clone(),
            outlet: article.outlet.clone(),
            outlet_type: article.outlet_type,
            url: article.url.clone(),
            published_at: article.published_at,
            summary: article.summary.clone(),
            similarity,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutletType {
    NationalBusinessTech,
    TradeSpecialist,
    Regional,
    Newsletter,
    Podcast,
}

impl OutletType {
    pub const ALL: [OutletType; 5] = [
        OutletType::NationalBusinessTech,
        OutletType::TradeSpecialist,
        OutletType::Regional,
        OutletType::Newsletter,
        OutletType::Podcast,
    ];

    pub const NAMES: [&'static str; 5] = [
        "national_business_tech",
        "trade_specialist",
        "regional",
        "newsletter",
        "podcast",
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OutletType::NationalBusinessTech => "national_business_tech",
            OutletType::TradeSpecialist => "trade_specialist",
            OutletType::Regional => "regional",
            OutletType::Newsletter => "newsletter",
            OutletType::Podcast => "podcast",
        }
    }
}

impl fmt::Display for OutletType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutletType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OutletType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| Error::invalid_choice(format!("Invalid outlet_types: {}", s), &OutletType::NAMES))
    }
}

/// Coverage region of an outlet, as tagged on stored articles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    Us,
    Uk,
    Eu,
    Global,
}

impl Region {
    pub const ALL: [Region; 4] = [Region::Us, Region::Uk, Region::Eu, Region::Global];

    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Us => "us",
            Region::Uk => "uk",
            Region::Eu => "eu",
            Region::Global => "global",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Region::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| Error::invalid_choice(format!("Invalid region: {}", s), &["us", "uk", "eu", "global"]))
    }
}

/// Geography a user selects to narrow a search. Expands to a set of [`Region`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeographyFilter {
    Us,
    UsEuUk,
    Global,
}

impl GeographyFilter {
    pub const ALL: [GeographyFilter; 3] = [GeographyFilter::Us, GeographyFilter::UsEuUk, GeographyFilter::Global];

    pub const NAMES: [&'static str; 3] = ["us", "us_eu_uk", "global"];

    pub fn as_str(&self) -> &'static str {
        match self {
            GeographyFilter::Us => "us",
            GeographyFilter::UsEuUk => "us_eu_uk",
            GeographyFilter::Global => "global",
        }
    }

    /// Regions matched by this selection; `None` means no restriction.
    pub fn regions(&self) -> Option<&'static [Region]> {
        match self {
            GeographyFilter::Us => Some(&[Region::Us]),
            GeographyFilter::UsEuUk => Some(&[Region::Us, Region::Uk, Region::Eu]),
            GeographyFilter::Global => None,
        }
    }
}

impl fmt::Display for GeographyFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GeographyFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GeographyFilter::ALL
            .into_iter()
            .find(|g| g.as_str() == s)
            .ok_or_else(|| Error::invalid_choice(format!("Invalid geography: {}", s), &GeographyFilter::NAMES))
    }
}

/// Best-effort contact details for a reporter. Every field may be unknown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub email: Option<String>,
    pub email_confidence: Option<f64>,
    pub linkedin_url: Option<String>,
    pub twitter_handle: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outlet_type_serde_names() {
        for (kind, name) in OutletType::ALL.iter().zip(OutletType::NAMES) {
            let json = serde_json::to_string(kind).unwrap();
            assert_eq!(json, format!("\"{}\"", name));
            assert_eq!(name.parse::<OutletType>().unwrap(), *kind);
        }
    }

    #[test]
    fn test_geography_filter_parse() {
        assert_eq!("us_eu_uk".parse::<GeographyFilter>().unwrap(), GeographyFilter::UsEuUk);
        let err = "mars".parse::<GeographyFilter>().unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "Invalid geography: mars");
    }

    #[test]
    fn test_embedding_text_without_summary() {
        let article = Article {
            id: "1".to_string(),
            title: "Battery startup raises seed".to_string(),
            author: None,
            outlet: "TechCrunch".to_string(),
            outlet_type: None,
            geography: None,
            section: None,
            url: "https://example.com/a".to_string(),
            published_at: None,
            summary: None,
            embedding: None,
        };
        assert_eq!(article.embedding_text(), "Battery startup raises seed. ");
    }
}

//! Typed similarity queries.
//!
//! A [`SimilarityQuery`] is an ordered list of [`Predicate`]s plus a query
//! vector and a row cap. Store adapters compile the predicates into whatever
//! their backend speaks; the in-memory store evaluates them directly.

use std::collections::BTreeSet;

use crate::types::{Article, GeographyFilter, OutletType, Region};

/// Size of the nearest-neighbour pool handed to reporter ranking.
pub const CANDIDATE_POOL: usize = 100;

#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    HasEmbedding,
    HasAuthor,
    OutletTypeIn(Vec<OutletType>),
    RegionIn(Vec<Region>),
}

impl Predicate {
    pub fn matches(&self, article: &Article) -> bool {
        match self {
            Predicate::HasEmbedding => article.embedding.is_some(),
            Predicate::HasAuthor => article.author.is_some(),
            Predicate::OutletTypeIn(kinds) => article.outlet_type.map_or(false, |t| kinds.contains(&t)),
            Predicate::RegionIn(regions) => article.geography.map_or(false, |r| regions.contains(&r)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityQuery {
    pub vector: Vec<f32>,
    pub predicates: Vec<Predicate>,
    pub limit: usize,
}

impl SimilarityQuery {
    pub fn matches(&self, article: &Article) -> bool {
        self.predicates.iter().all(|p| p.matches(article))
    }
}

/// Expands geography selections into the regions to match.
///
/// Returns `None` when no restriction applies: nothing was selected, or a
/// `global` selection absorbs the rest.
pub fn expand_geography(selections: &[GeographyFilter]) -> Option<Vec<Region>> {
    if selections.is_empty() {
        return None;
    }

    let mut regions = BTreeSet::new();
    for selection in selections {
        regions.extend(selection.regions()?.iter().copied());
    }
    Some(regions.into_iter().collect())
}

#[derive(Debug, Clone)]
pub struct QueryBuilder {
    vector: Vec<f32>,
    outlet_types: Vec<OutletType>,
    geography: Vec<GeographyFilter>,
    limit: usize,
}

impl QueryBuilder {
    pub fn new(vector: Vec<f32>) -> Self {
        Self {
            vector,
            outlet_types: Vec::new(),
            geography: Vec::new(),
            limit: CANDIDATE_POOL,
        }
    }

    pub fn outlet_types(mut self, outlet_types: &[OutletType]) -> Self {
        self.outlet_types = outlet_types.to_vec();
        self
    }

    pub fn geography(mut self, geography: &[GeographyFilter]) -> Self {
        self.geography = geography.to_vec();
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn build(self) -> SimilarityQuery {
        let mut predicates = vec![Predicate::HasEmbedding, Predicate::HasAuthor];

        if !self.outlet_types.is_empty() {
            let kinds: BTreeSet<_> = self.outlet_types.into_iter().collect();
            predicates.push(Predicate::OutletTypeIn(kinds.into_iter().collect()));
        }
        if let Some(regions) = expand_geography(&self.geography) {
            predicates.push(Predicate::RegionIn(regions));
        }

        SimilarityQuery {
            vector: self.vector,
            predicates,
            limit: self.limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use GeographyFilter::*;

    #[test]
    fn test_expand_geography() {
        assert_eq!(expand_geography(&[Us]), Some(vec![Region::Us]));
        assert_eq!(expand_geography(&[UsEuUk]), Some(vec![Region::Us, Region::Uk, Region::Eu]));
        assert_eq!(expand_geography(&[Us, UsEuUk]), Some(vec![Region::Us, Region::Uk, Region::Eu]));
        assert_eq!(expand_geography(&[Global]), None);
        assert_eq!(expand_geography(&[Us, Global]), None);
        assert_eq!(expand_geography(&[]), None);
    }

    #[test]
    fn test_build_without_filters_has_base_predicates_only() {
        let query = QueryBuilder::new(vec![1.0, 0.0]).build();
        assert_eq!(query.predicates, vec![Predicate::HasEmbedding, Predicate::HasAuthor]);
        assert_eq!(query.limit, CANDIDATE_POOL);
    }

    #[test]
    fn test_build_with_filters() {
        let query = QueryBuilder::new(vec![1.0])
            .outlet_types(&[OutletType::Regional, OutletType::TradeSpecialist, OutletType::Regional])
            .geography(&[Us])
            .limit(10)
            .build();

        assert_eq!(
            query.predicates,
            vec![
                Predicate::HasEmbedding,
                Predicate::HasAuthor,
                Predicate::OutletTypeIn(vec![OutletType::TradeSpecialist, OutletType::Regional]),
                Predicate::RegionIn(vec![Region::Us]),
            ]
        );
        assert_eq!(query.limit, 10);
    }

    #[test]
    fn test_global_drops_region_predicate() {
        let query = QueryBuilder::new(vec![1.0]).geography(&[UsEuUk, Global]).build();
        assert!(!query.predicates.iter().any(|p| matches!(p, Predicate::RegionIn(_))));
    }

    #[test]
    fn test_predicates_match_articles() {
        let article = Article {
            id: "a".to_string(),
            title: "t".to_string(),
            author: Some("Jane Smith".to_string()),
            outlet: "Utility Dive".to_string(),
            outlet_type: Some(OutletType::TradeSpecialist),
            geography: None,
            section: None,
            url: "https://example.com/t".to_string(),
            published_at: None,
            summary: None,
            embedding: Some(vec![1.0]),
        };

        assert!(Predicate::HasEmbedding.matches(&article));
        assert!(Predicate::HasAuthor.matches(&article));
        assert!(Predicate::OutletTypeIn(vec![OutletType::TradeSpecialist]).matches(&article));
        assert!(!Predicate::OutletTypeIn(vec![OutletType::Regional]).matches(&article));
        assert!(!Predicate::RegionIn(vec![Region::Us]).matches(&article));
    }
}

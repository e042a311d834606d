use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use pitch_core::{
    Article, ArticleMatch, ArticleStorage, EmbeddingModel, Error, OutletType, Region, Result, SimilarityQuery, StoreOutcome,
};
use pitch_inference::models::DummyModel;
use pitch_search::{MockContactEnricher, SearchService};
use pitch_storage::InMemoryStorage;
use pitch_web::{create_app, AppState};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

const DIMENSIONS: usize = 128;

#[derive(Debug)]
struct BrokenModel;

#[async_trait]
impl EmbeddingModel for BrokenModel {
    fn name(&self) -> &str {
        "broken"
    }

    fn max_batch_size(&self) -> usize {
        1
    }

    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Err(Error::Embedding("quota exceeded".to_string()))
    }

    async fn embed_batch(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Err(Error::Embedding("quota exceeded".to_string()))
    }
}

/// Store whose queries fail with a message that must never reach clients.
struct UnreachableStore;

#[async_trait]
impl ArticleStorage for UnreachableStore {
    async fn store_article(&self, _article: &Article) -> Result<StoreOutcome> {
        Ok(StoreOutcome::Inserted)
    }

    async fn set_embedding(&self, _id: &str, _embedding: &[f32]) -> Result<()> {
        Ok(())
    }

    async fn pending_embeddings(&self, _limit: usize) -> Result<Vec<Article>> {
        Ok(Vec::new())
    }

    async fn find_similar(&self, _query: &SimilarityQuery) -> Result<Vec<ArticleMatch>> {
        Err(Error::Database("password=hunter2 host db-internal:5432 unreachable".to_string()))
    }

    async fn count(&self) -> Result<usize> {
        Ok(0)
    }
}

async fn seeded_storage() -> Arc<InMemoryStorage> {
    let model = DummyModel::new(DIMENSIONS);
    let storage = InMemoryStorage::new();
    let rows = [
        ("Jane Smith", "Utility Dive", OutletType::TradeSpecialist, "battery storage startup raises funding"),
        ("Tom Jones", "Wired", OutletType::NationalBusinessTech, "battery startups and the grid"),
    ];
    for (i, (author, outlet, outlet_type, title)) in rows.iter().enumerate() {
        let article = Article {
            id: format!("a{}", i),
            title: title.to_string(),
            author: Some(author.to_string()),
            outlet: outlet.to_string(),
            outlet_type: Some(*outlet_type),
            geography: Some(Region::Us),
            section: None,
            url: format!("https://example.com/{}", i),
            published_at: Some(Utc::now() - Duration::days(2)),
            summary: None,
            embedding: Some(model.embed(title).await.unwrap()),
        };
        storage.store_article(&article).await.unwrap();
    }
    Arc::new(storage)
}

async fn app_with(model: Arc<dyn EmbeddingModel>) -> Router {
    let service = SearchService::new(model, seeded_storage().await, Arc::new(MockContactEnricher::new()));
    create_app(AppState::new(service))
}

async fn app() -> Router {
    app_with(Arc::new(DummyModel::new(DIMENSIONS))).await
}

async fn post_search(app: Router, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/api/search")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn health_reports_ok() {
    let request = Request::builder().uri("/api/health").body(Body::empty()).unwrap();
    let response = app().await.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "ok");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn search_returns_ranked_reporters() {
    let (status, body) = post_search(app().await, r#"{"brief": "battery storage startup"}"#).await;
    assert_eq!(status, StatusCode::OK);

    let reporters = body["reporters"].as_array().unwrap();
    assert_eq!(body["total"], json!(reporters.len()));
    assert!(!reporters.is_empty());
    for reporter in reporters {
        assert!(reporter["justification"].as_str().unwrap().contains("Overall relevance score"));
        assert!(reporter["reporter"]["email"].as_str().unwrap().ends_with(".com"));
        assert!(reporter["articles"].as_array().unwrap().len() <= 3);
    }
}

#[tokio::test]
async fn search_respects_outlet_filter() {
    let (status, body) = post_search(
        app().await,
        r#"{"brief": "battery storage startup", "outlet_types": ["trade_specialist"], "geography": ["us"]}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], json!(1));
    assert_eq!(body["reporters"][0]["reporter"]["name"], "Jane Smith");
}

#[tokio::test]
async fn search_with_no_candidates_is_empty() {
    let (status, body) = post_search(
        app().await,
        r#"{"brief": "battery storage startup", "outlet_types": ["podcast"]}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "reporters": [], "total": 0 }));
}

#[tokio::test]
async fn missing_brief_is_bad_request() {
    let (status, body) = post_search(app().await, r#"{"brief": ""}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "brief is required and must be a non-empty string" }));

    let (status, _) = post_search(app().await, "not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn invalid_outlet_type_lists_valid_values() {
    let (status, body) = post_search(app().await, r#"{"brief": "x", "outlet_types": ["blog"]}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid outlet_types: blog");
    assert_eq!(
        body["valid"],
        json!(["national_business_tech", "trade_specialist", "regional", "newsletter", "podcast"])
    );
}

#[tokio::test]
async fn embedding_failure_is_bad_gateway() {
    let (status, body) = post_search(app_with(Arc::new(BrokenModel)).await, r#"{"brief": "x"}"#).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body, json!({ "error": "Embedding failed: quota exceeded" }));
}

#[tokio::test]
async fn store_failure_is_generic_server_error() {
    let service = SearchService::new(
        Arc::new(DummyModel::new(DIMENSIONS)),
        Arc::new(UnreachableStore),
        Arc::new(MockContactEnricher::new()),
    );
    let app = create_app(AppState::new(service));

    let (status, body) = post_search(app, r#"{"brief": "battery storage startup"}"#).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Search failed" }));

    let text = body.to_string();
    for leaked in ["hunter2", "db-internal", "Database error", "unreachable"] {
        assert!(!text.contains(leaked), "response leaked {leaked}: {text}");
    }
}

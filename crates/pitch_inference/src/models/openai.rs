use async_trait::async_trait;
use pitch_core::{EmbeddingModel, Error, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;
use url::Url;

use crate::Config;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1/";
const DEFAULT_MODEL: &str = "text-embedding-3-small";
const MAX_BATCH_SIZE: usize = 2048;

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    index: usize,
    embedding: Vec<f32>,
}

/// Embeddings over the OpenAI REST API (or any server speaking it).
pub struct OpenAiModel {
    client: Client,
    api_key: Option<String>,
    base_url: Url,
    model: String,
}

impl OpenAiModel {
    pub fn new(config: &Config) -> Result<Self> {
        let base = config.model_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        // Url::join drops the last path segment unless it ends with a slash.
        let base = if base.ends_with('/') {
            base.to_string()
        } else {
            format!("{}/", base)
        };
        let base_url = Url::parse(&base)
            .map_err(|e| Error::Embedding(format!("Invalid model url {}: {}", base, e)))?;

        Ok(Self {
            client: Client::new(),
            api_key: config.api_key.clone().filter(|k| !k.trim().is_empty()),
            base_url,
            model: config
                .embedding_model
                .as_deref()
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .unwrap_or(DEFAULT_MODEL)
                .to_string(),
        })
    }

    fn endpoint(&self) -> Result<Url> {
        self.base_url
            .join("embeddings")
            .map_err(|e| Error::Embedding(format!("Invalid embeddings endpoint: {}", e)))
    }
}

impl fmt::Debug for OpenAiModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiModel")
            .field("client", &"<reqwest::Client>")
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url.as_str())
            .field("model", &self.model)
            .finish()
    }
}

#[async_trait]
impl EmbeddingModel for OpenAiModel {
    fn name(&self) -> &str {
        "OpenAI"
    }

    fn max_batch_size(&self) -> usize {
        MAX_BATCH_SIZE
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_batch(&[text.to_string()])
            .await?
            .pop()
            .ok_or_else(|| Error::Embedding("OpenAI returned no embedding".to_string()))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| Error::Embedding("OPENAI_API_KEY is not set".to_string()))?;

        let request = EmbeddingRequest {
            model: &self.model,
            input: texts,
        };
        debug!(inputs = texts.len(), model = %self.model, "requesting embeddings");

        let response = self
            .client
            .post(self.endpoint()?)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Embedding(format!("OpenAI request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Embedding(format!("OpenAI returned {}: {}", status, body)));
        }

        let mut response = response
            .json::<EmbeddingResponse>()
            .await
            .map_err(|e| Error::Embedding(format!("Malformed OpenAI response: {}", e)))?;

        if response.data.len() != texts.len() {
            return Err(Error::Embedding(format!(
                "OpenAI returned {} embeddings for {} inputs",
                response.data.len(),
                texts.len()
            )));
        }
        response.data.sort_by_key(|d| d.index);
        Ok(response.data.into_iter().map(|d| d.embedding).collect())
    }
}

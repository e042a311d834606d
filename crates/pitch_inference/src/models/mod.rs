use pitch_core::{EmbeddingModel, Error, Result};
use std::sync::Arc;
use tracing::info;

use crate::Config;

pub mod dummy;
pub mod openai;

pub use dummy::DummyModel;
pub use openai::OpenAiModel;

/// Builds the embedding model named in `config` (`openai` by default).
pub async fn create_model(config: Option<Config>) -> Result<Arc<dyn EmbeddingModel>> {
    let config = config.unwrap_or_default();
    let model_name = config.model_name.clone().unwrap_or_else(|| "openai".to_string());

    let model: Arc<dyn EmbeddingModel> = match model_name.as_str() {
        "openai" => Arc::new(OpenAiModel::new(&config)?),
        "dummy" => Arc::new(DummyModel::new(config.dimensions)),
        other => {
            return Err(Error::Embedding(format!(
                "Unknown embedding model: {}. Available models: openai, dummy",
                other
            )))
        }
    };

    info!(model = model.name(), "embedding model ready");
    Ok(model)
}

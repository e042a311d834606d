use async_trait::async_trait;
use pitch_core::{ArticleStorage, Error, Result};
use std::sync::Arc;
use tracing::info;

pub mod backends;

pub use backends::*;

/// A store that can be brought up once per process and shared across requests.
#[async_trait]
pub trait StorageBackend: ArticleStorage {
    fn get_error_message() -> &'static str
    where
        Self: Sized;

    async fn initialize(config: &BackendConfig) -> Result<Self>
    where
        Self: Sized;
}

#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub url: String,
}

impl BackendConfig {
    pub fn new(url: String) -> Self {
        Self { url }
    }

    pub fn with_url(&mut self, url: &str) -> &mut Self {
        self.url = url.to_string();
        self
    }
}

/// Opens the named storage backend, optionally pointing it at `backend_url`.
pub async fn create_storage(kind: &str, backend_url: Option<&str>) -> Result<Arc<dyn ArticleStorage>> {
    match kind {
        "memory" => {
            let mut config = MemoryConfig::new().config;
            if let Some(url) = backend_url {
                config.with_url(url);
            }
            open::<InMemoryStorage>(&config).await
        }
        #[cfg(feature = "sqlite")]
        "sqlite" => {
            let mut config = SqliteConfig::new().config;
            if let Some(url) = backend_url {
                config.with_url(url);
            }
            open::<SQLiteStorage>(&config).await
        }
        other => Err(Error::Storage(format!("Unknown storage backend: {}", other))),
    }
}

async fn open<T: StorageBackend + 'static>(config: &BackendConfig) -> Result<Arc<dyn ArticleStorage>> {
    let storage = T::initialize(config)
        .await
        .map_err(|e| Error::Storage(format!("{} ({})", T::get_error_message(), e)))?;
    info!(url = %config.url, "storage backend ready");
    Ok(Arc::new(storage))
}

pub mod prelude {
    pub use super::backends::*;
    pub use super::{create_storage, BackendConfig, StorageBackend};
}

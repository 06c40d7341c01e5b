use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use bg_core::{ArticleStorage, Error, Result};

pub mod backends;

pub use backends::*;

pub const DEFAULT_SQLITE_URL: &str = "sqlite:articles.db";

#[async_trait]
pub trait StorageBackend: ArticleStorage + Sized {
    /// Shown when the backend cannot be reached.
    fn get_error_message() -> &'static str;

    async fn connect(config: &BackendConfig) -> Result<Self>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    pub url: String,
}

impl BackendConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    pub fn with_url(&mut self, url: &str) {
        self.url = url.to_string();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    Memory,
    Sqlite,
}

impl FromStr for StorageKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "memory" => Ok(StorageKind::Memory),
            "sqlite" => Ok(StorageKind::Sqlite),
            other => Err(Error::Config(format!(
                "Unknown storage backend '{}'. Available backends: memory, sqlite",
                other
            ))),
        }
    }
}

async fn connect<T: StorageBackend + 'static>(
    config: &BackendConfig,
) -> Result<Arc<dyn ArticleStorage>> {
    match T::connect(config).await {
        Ok(storage) => Ok(Arc::new(storage)),
        Err(e) => {
            tracing::error!("{}: {}", T::get_error_message(), e);
            Err(e)
        }
    }
}

/// Build the storage backend named by `kind`.
pub async fn create_storage(kind: &str, url: Option<&str>) -> Result<Arc<dyn ArticleStorage>> {
    match kind.parse::<StorageKind>()? {
        StorageKind::Memory => {
            connect::<MemoryStorage>(&BackendConfig::new(url.unwrap_or("memory://"))).await
        }
        #[cfg(feature = "sqlite")]
        StorageKind::Sqlite => {
            connect::<SQLiteStorage>(&BackendConfig::new(url.unwrap_or(DEFAULT_SQLITE_URL))).await
        }
        #[cfg(not(feature = "sqlite"))]
        StorageKind::Sqlite => Err(Error::Config(
            "bg_storage was built without the sqlite feature".to_string(),
        )),
    }
}

pub mod prelude {
    pub use super::backends::*;
    pub use super::{create_storage, BackendConfig, StorageBackend, StorageKind};
}

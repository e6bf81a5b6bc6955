//! Application context shared with every route handler via Axum state.

use std::sync::Arc;

use catalog_core::config::{Config, StorageBackend, StorageConfig};
use catalog_core::{CatalogStore, Error, Result};
use catalog_db::SqliteCatalogStore;
use catalog_storage::{ImageStore, JsonCatalogStore};

use crate::service::CatalogService;

/// Application context shared by all request handlers (via Axum state).
///
/// This is cheaply cloneable because it only holds `Arc`s.
#[derive(Clone)]
pub struct AppContext {
    /// Immutable application configuration snapshot.
    pub config: Arc<Config>,
    /// Catalog operations over the configured backend.
    pub service: Arc<CatalogService>,
}

impl AppContext {
    pub fn new(config: Config, service: CatalogService) -> Self {
        Self {
            config: Arc::new(config),
            service: Arc::new(service),
        }
    }

    /// Open the image store and the configured catalog backend.
    pub fn from_config(config: Config) -> Result<Self> {
        let images = Arc::new(ImageStore::open(&config.storage.images_dir)?);
        let store = open_catalog_store(&config.storage)?;
        let service = CatalogService::new(store, images, &config.catalog);
        tracing::info!(
            backend = service.backend_name(),
            images = %config.storage.images_dir.display(),
            "Catalog storage ready"
        );
        Ok(Self::new(config, service))
    }
}

/// Construct the [`CatalogStore`] selected by `storage.backend`.
pub fn open_catalog_store(storage: &StorageConfig) -> Result<Arc<dyn CatalogStore>> {
    match storage.backend {
        StorageBackend::Json => Ok(Arc::new(JsonCatalogStore::open(&storage.catalog_path)?)),
        StorageBackend::Sqlite => {
            let db_path = &storage.db_path;
            if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
                if !parent.exists() {
                    std::fs::create_dir_all(parent)
                        .map_err(|e| Error::storage_write(parent.display(), e))?;
                    tracing::info!("Created database directory {}", parent.display());
                }
            }
            let existed = db_path.exists();
            let store = SqliteCatalogStore::open(db_path)?;
            if existed {
                tracing::info!("Database opened (existing) at {}", db_path.display());
            } else {
                tracing::info!("Database created (new) at {}", db_path.display());
            }
            Ok(Arc::new(store))
        }
    }
}

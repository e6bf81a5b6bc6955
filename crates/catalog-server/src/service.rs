//! Catalog business logic.
//!
//! [`CatalogService`] holds no state of its own: every call re-reads the
//! catalog from the injected [`CatalogStore`], so it works the same over
//! either backend.

use std::sync::Arc;

use bytes::Bytes;
use catalog_core::config::CatalogConfig;
use catalog_core::{Catalog, CatalogStore, Error, Item, ItemId, Result};
use catalog_storage::ImageStore;

/// An image attached to a new item submission.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub content: Bytes,
    /// File extension including the leading dot, or empty.
    pub ext: String,
}

/// Input for [`CatalogService::create_item`].
#[derive(Debug, Clone)]
pub struct NewItem {
    pub name: String,
    pub category: String,
    pub image: Option<ImageUpload>,
}

/// Create, list, look up, and search catalog items.
pub struct CatalogService {
    store: Arc<dyn CatalogStore>,
    images: Arc<ImageStore>,
    require_image: bool,
}

impl CatalogService {
    pub fn new(store: Arc<dyn CatalogStore>, images: Arc<ImageStore>, policy: &CatalogConfig) -> Self {
        Self {
            store,
            images,
            require_image: policy.require_image,
        }
    }

    pub fn images(&self) -> &ImageStore {
        &self.images
    }

    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }

    /// The whole catalog in insertion order.
    pub fn list_items(&self) -> Result<Catalog> {
        self.store.load()
    }

    /// The item with `id`.
    pub fn get_item(&self, id: &str) -> Result<Item> {
        self.store
            .get(id)?
            .ok_or_else(|| Error::not_found("item", id))
    }

    /// Items whose name or category contains `keyword`, in insertion order.
    pub fn search_items(&self, keyword: &str) -> Result<Vec<Item>> {
        if keyword.is_empty() {
            return Err(Error::InvalidArgument("keyword is required".into()));
        }
        self.store.search(keyword)
    }

    /// Store the image (if any), then append a new item to the catalog.
    ///
    /// The image is written first so a persisted item never points at a
    /// missing file. If the catalog write fails the image stays behind.
    pub fn create_item(&self, new_item: NewItem) -> Result<Item> {
        if new_item.image.is_none() && self.require_image {
            return Err(Error::InvalidArgument("image is required".into()));
        }

        let image_name = new_item
            .image
            .map(|img| self.images.put(&img.content, &img.ext))
            .transpose()?;

        let item = Item {
            id: ItemId::generate(),
            name: new_item.name,
            category: new_item.category,
            image_name,
        };

        self.store.update(&mut |catalog| {
            if catalog.find(item.id.as_str()).is_some() {
                return Err(Error::Conflict(format!("item id {} already exists", item.id)));
            }
            catalog.items.push(item.clone());
            Ok(())
        })?;

        tracing::info!(
            id = %item.id,
            name = %item.name,
            image = item.image_name.as_deref().unwrap_or("-"),
            "Item created"
        );
        Ok(item)
    }
}

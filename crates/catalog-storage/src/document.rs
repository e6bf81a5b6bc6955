//! [`CatalogStore`] backed by a single JSON document.
//!
//! The document has the shape `{"items": [...]}` and is rewritten in full
//! on every change: serialized to a temp file beside it, fsynced, and
//! renamed over the old one. A crash mid-write leaves the previous document.

use std::io::Write;
use std::path::{Path, PathBuf};

use catalog_core::{Catalog, CatalogStore, Error, Result};
use parking_lot::Mutex;

/// Document-file catalog backend.
#[derive(Debug)]
pub struct JsonCatalogStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonCatalogStore {
    /// Open the document at `path`, creating its parent directory if needed.
    ///
    /// The document itself is not created until the first write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::storage_write(parent.display(), e))?;
        }
        tracing::info!("Opened JSON catalog at {}", path.display());
        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> Result<Catalog> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Catalog::default()),
            Err(e) => return Err(Error::from(e)),
        };

        let catalog: Catalog = serde_json::from_slice(&bytes)
            .map_err(|e| Error::corrupt(self.path.display(), e.to_string()))?;

        if let Some(id) = catalog.first_duplicate_id() {
            return Err(Error::corrupt(
                self.path.display(),
                format!("duplicate item id {id}"),
            ));
        }

        Ok(catalog)
    }

    fn write_document(&self, catalog: &Catalog) -> Result<()> {
        let json = serde_json::to_vec_pretty(catalog)
            .map_err(|e| Error::Internal(format!("Failed to serialize catalog: {e}")))?;

        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };

        let mut tmp = tempfile::NamedTempFile::new_in(dir)
            .map_err(|e| Error::storage_write(self.path.display(), e))?;
        tmp.write_all(&json)
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|e| Error::storage_write(self.path.display(), e))?;
        tmp.persist(&self.path)
            .map_err(|e| Error::storage_write(self.path.display(), e.error))?;

        tracing::debug!(items = catalog.len(), "Wrote catalog document");
        Ok(())
    }
}

impl CatalogStore for JsonCatalogStore {
    fn backend_name(&self) -> &'static str {
        "json"
    }

    fn load(&self) -> Result<Catalog> {
        self.read_document()
    }

    fn replace(&self, catalog: &Catalog) -> Result<()> {
        if let Some(id) = catalog.first_duplicate_id() {
            return Err(Error::Conflict(format!("duplicate item id {id}")));
        }
        let _guard = self.write_lock.lock();
        self.write_document(catalog)
    }

    fn update(&self, mutate: &mut dyn FnMut(&mut Catalog) -> Result<()>) -> Result<Catalog> {
        let _guard = self.write_lock.lock();
        let mut catalog = self.read_document()?;
        mutate(&mut catalog)?;
        if let Some(id) = catalog.first_duplicate_id() {
            return Err(Error::Conflict(format!("duplicate item id {id}")));
        }
        self.write_document(&catalog)?;
        Ok(catalog)
    }
}

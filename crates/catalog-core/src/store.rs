//! The persistence interface every catalog backend implements.

use crate::error::Result;
use crate::models::{Catalog, Item};

/// Durable store for the item list.
///
/// All implementations must satisfy these invariants:
/// - `load` on a store that was never written returns an empty catalog.
/// - `load` on unreadable persisted state fails with
///   [`Error::CorruptData`](crate::Error::CorruptData); it never pretends
///   the catalog is empty.
/// - `replace` is all-or-nothing: a failed write leaves the previous state
///   observable by the next `load`.
/// - `update` runs load-mutate-replace with at most one writer at a time,
///   so concurrent appends are never lost.
pub trait CatalogStore: Send + Sync {
    /// Short backend name for logs.
    fn backend_name(&self) -> &'static str;

    /// Read the full catalog in insertion order.
    fn load(&self) -> Result<Catalog>;

    /// Overwrite the persisted catalog with `catalog`.
    fn replace(&self, catalog: &Catalog) -> Result<()>;

    /// Load, apply `mutate`, and persist the result as one serialized step.
    ///
    /// If `mutate` returns an error nothing is written. Returns the catalog
    /// as persisted.
    fn update(&self, mutate: &mut dyn FnMut(&mut Catalog) -> Result<()>) -> Result<Catalog>;

    /// First item with `id`, in insertion order.
    fn get(&self, id: &str) -> Result<Option<Item>> {
        Ok(self.load()?.find(id).cloned())
    }

    /// Items whose name or category contains `keyword` (case-sensitive).
    fn search(&self, keyword: &str) -> Result<Vec<Item>> {
        Ok(self.load()?.search(keyword))
    }
}

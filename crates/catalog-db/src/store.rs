//! [`CatalogStore`] backed by the SQLite `items` table.

use std::path::Path;

use catalog_core::{Catalog, CatalogStore, Error, Item, Result};
use parking_lot::Mutex;
use rusqlite::{Connection, TransactionBehavior};

use crate::pool::{get_conn, DbPool};
use crate::queries::items;

const TARGET: &str = "items table";

/// Relational catalog backend.
///
/// Writers are serialized twice: an in-process mutex keeps threads of this
/// process from interleaving, and `BEGIN IMMEDIATE` takes SQLite's write
/// lock up front so other processes sharing the file wait as well.
pub struct SqliteCatalogStore {
    pool: DbPool,
    write_lock: Mutex<()>,
}

impl SqliteCatalogStore {
    pub fn new(pool: DbPool) -> Self {
        Self {
            pool,
            write_lock: Mutex::new(()),
        }
    }

    /// Open (creating if needed) the database file at `db_path`.
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self> {
        let db_path = db_path.as_ref();
        let pool = crate::pool::init_pool(db_path)?;
        tracing::info!("Opened SQLite catalog at {}", db_path.display());
        Ok(Self::new(pool))
    }

    fn write_all(conn: &Connection, catalog: &Catalog) -> Result<()> {
        items::delete_all(conn).map_err(|e| Error::storage_write(TARGET, e))?;
        for item in &catalog.items {
            items::insert_item(conn, item).map_err(|e| Error::storage_write(TARGET, e))?;
        }
        Ok(())
    }
}

impl CatalogStore for SqliteCatalogStore {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    fn load(&self) -> Result<Catalog> {
        let conn = get_conn(&self.pool)?;
        Ok(Catalog::new(items::list_items(&conn)?))
    }

    fn replace(&self, catalog: &Catalog) -> Result<()> {
        if let Some(id) = catalog.first_duplicate_id() {
            return Err(Error::Conflict(format!("duplicate item id {id}")));
        }

        let _guard = self.write_lock.lock();
        let mut conn = get_conn(&self.pool)?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|e| Error::storage_write(TARGET, e))?;
        Self::write_all(&tx, catalog)?;
        tx.commit().map_err(|e| Error::storage_write(TARGET, e))
    }

    fn update(&self, mutate: &mut dyn FnMut(&mut Catalog) -> Result<()>) -> Result<Catalog> {
        let _guard = self.write_lock.lock();
        let mut conn = get_conn(&self.pool)?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|e| Error::storage_write(TARGET, e))?;

        let mut catalog = Catalog::new(items::list_items(&tx)?);
        mutate(&mut catalog)?;
        if let Some(id) = catalog.first_duplicate_id() {
            return Err(Error::Conflict(format!("duplicate item id {id}")));
        }

        Self::write_all(&tx, &catalog)?;
        tx.commit().map_err(|e| Error::storage_write(TARGET, e))?;
        Ok(catalog)
    }

    fn get(&self, id: &str) -> Result<Option<Item>> {
        let conn = get_conn(&self.pool)?;
        items::get_item(&conn, id)
    }

    fn search(&self, keyword: &str) -> Result<Vec<Item>> {
        let conn = get_conn(&self.pool)?;
        items::search_items(&conn, keyword)
    }
}

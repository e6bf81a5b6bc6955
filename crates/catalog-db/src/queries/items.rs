//! Item list, lookup, search, and bulk-write operations.

use catalog_core::{Item, Result};
use rusqlite::Connection;

use crate::models::{item_from_row, read_error};

/// Column list used in SELECT statements.
pub const COLS: &str = "id, name, category, image_name";

/// List every item in append order.
pub fn list_items(conn: &Connection) -> Result<Vec<Item>> {
    let q = format!("SELECT {COLS} FROM items ORDER BY position ASC");
    let mut stmt = conn.prepare(&q).map_err(read_error)?;
    let rows = stmt
        .query_map([], item_from_row)
        .map_err(read_error)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(read_error)?;
    Ok(rows)
}

/// Get an item by ID.
pub fn get_item(conn: &Connection, id: &str) -> Result<Option<Item>> {
    let q = format!("SELECT {COLS} FROM items WHERE id = ?1");
    let result = conn.query_row(&q, [id], item_from_row);
    match result {
        Ok(i) => Ok(Some(i)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(read_error(e)),
    }
}

/// Items whose name or category contains `keyword`, in append order.
///
/// `instr` is case-sensitive, unlike `LIKE`, and needs no wildcard escaping.
pub fn search_items(conn: &Connection, keyword: &str) -> Result<Vec<Item>> {
    let q = format!(
        "SELECT {COLS} FROM items
         WHERE instr(name, ?1) > 0 OR instr(category, ?1) > 0
         ORDER BY position ASC"
    );
    let mut stmt = conn.prepare(&q).map_err(read_error)?;
    let rows = stmt
        .query_map([keyword], item_from_row)
        .map_err(read_error)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(read_error)?;
    Ok(rows)
}

/// Append one item. Fails if the id already exists.
pub fn insert_item(conn: &Connection, item: &Item) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO items (id, name, category, image_name) VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![
            item.id.as_str(),
            item.name,
            item.category,
            item.image_name,
        ],
    )?;
    Ok(())
}

/// Remove every item.
pub fn delete_all(conn: &Connection) -> rusqlite::Result<usize> {
    conn.execute("DELETE FROM items", [])
}

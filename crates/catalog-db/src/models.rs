//! Row mapping between the `items` table and [`Item`].

use catalog_core::{Error, Item, ItemId};

/// Build an [`Item`] from a row selected with [`crate::queries::items::COLS`].
pub fn item_from_row(row: &rusqlite::Row) -> rusqlite::Result<Item> {
    let image_name: Option<String> = row.get(3)?;
    Ok(Item {
        id: ItemId::from(row.get::<_, String>(0)?),
        name: row.get(1)?,
        category: row.get(2)?,
        image_name: image_name.filter(|s| !s.is_empty()),
    })
}

/// Classify a rusqlite error raised while reading rows.
///
/// Type mismatches mean the stored data is bad, not the connection.
pub(crate) fn read_error(e: rusqlite::Error) -> Error {
    match e {
        rusqlite::Error::InvalidColumnType(..) | rusqlite::Error::FromSqlConversionFailure(..) => {
            Error::corrupt("items table", e.to_string())
        }
        other => Error::database(other),
    }
}

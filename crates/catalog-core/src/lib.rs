//! catalog-core: shared types, ids, errors, configuration, and the store trait.
//!
//! This crate is the foundational dependency for all other catalog-* crates,
//! providing the item model, a unified error type, application configuration,
//! and the [`CatalogStore`] interface both persistence backends implement.

pub mod config;
pub mod error;
pub mod ids;
pub mod models;
pub mod store;

// Re-export the most commonly used items at the crate root.
pub use error::{Error, Result};
pub use ids::ItemId;
pub use models::{Catalog, Item};
pub use store::CatalogStore;

//! catalog-db: the relational catalog backend.
//!
//! This crate provides SQLite-backed storage with connection pooling,
//! embedded migrations, item queries, and [`SqliteCatalogStore`], which
//! implements the same [`catalog_core::CatalogStore`] contract as the
//! document-file backend.

pub mod migrations;
pub mod models;
pub mod pool;
pub mod queries;
pub mod store;

pub use store::SqliteCatalogStore;

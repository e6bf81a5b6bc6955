//! catalog-storage: filesystem persistence for the catalog.
//!
//! Provides the content-addressed [`ImageStore`] and the document-file
//! [`JsonCatalogStore`] backend.

pub mod document;
pub mod images;

pub use document::JsonCatalogStore;
pub use images::{extension_of, ImageStore};

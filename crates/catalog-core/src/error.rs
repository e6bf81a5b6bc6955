//! Unified error type for the catalog service.
//!
//! All crates funnel their failures into [`Error`], which carries enough context
//! for API handlers to derive an HTTP status code via [`Error::http_status`].

use std::fmt;

/// Unified error type covering all failure modes of the catalog.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required input was missing or empty.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The requested entity could not be found.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of entity (e.g. "item", "image").
        entity: String,
        /// The identifier that was looked up.
        id: String,
    },

    /// A conflicting resource already exists.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Writing persisted state failed. The previous state is left intact.
    #[error("Storage write error [{target}]: {source}")]
    StorageWrite {
        /// What was being written (a path or a table).
        target: String,
        /// The underlying failure.
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Persisted state exists but could not be interpreted.
    #[error("Corrupt data [{target}]: {message}")]
    CorruptData {
        /// What was being read (a path or a table).
        target: String,
        /// Human-readable description of the problem.
        message: String,
    },

    /// A database operation failed.
    #[error("Database error: {source}")]
    Database {
        /// The underlying database error.
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// An I/O operation failed.
    #[error("IO error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Catch-all for unexpected internal errors.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Map this error to an appropriate HTTP status code.
    pub fn http_status(&self) -> u16 {
        match self {
            Error::InvalidArgument(_) => 400,
            Error::NotFound { .. } => 404,
            Error::Conflict(_) => 409,
            Error::StorageWrite { .. } => 500,
            Error::CorruptData { .. } => 500,
            Error::Database { .. } => 500,
            Error::Io { .. } => 500,
            Error::Internal(_) => 500,
        }
    }

    /// Short machine-readable code used in API error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            Error::InvalidArgument(_) => "invalid_argument",
            Error::NotFound { .. } => "not_found",
            Error::Conflict(_) => "conflict",
            Error::StorageWrite { .. } => "storage_write_error",
            Error::CorruptData { .. } => "corrupt_data",
            Error::Database { .. } => "database_error",
            Error::Io { .. } => "io_error",
            Error::Internal(_) => "internal_error",
        }
    }

    /// Convenience constructor for [`Error::NotFound`].
    pub fn not_found(entity: impl Into<String>, id: impl fmt::Display) -> Self {
        Error::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Convenience constructor for [`Error::StorageWrite`].
    pub fn storage_write(
        target: impl fmt::Display,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Error::StorageWrite {
            target: target.to_string(),
            source: source.into(),
        }
    }

    /// Convenience constructor for [`Error::CorruptData`].
    pub fn corrupt(target: impl fmt::Display, message: impl Into<String>) -> Self {
        Error::CorruptData {
            target: target.to_string(),
            message: message.into(),
        }
    }

    /// Convenience constructor for [`Error::Database`].
    pub fn database(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Error::Database {
            source: source.into(),
        }
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

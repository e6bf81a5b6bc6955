//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`] which points a config at a fresh temp directory
//! and builds the full [`AppContext`]. The `with_server` constructors start
//! Axum on a random port for HTTP-level testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::PathBuf;

use catalog_core::config::{Config, StorageBackend};
use catalog_server::context::AppContext;
use catalog_server::router::build_router;
use tempfile::TempDir;

/// Test harness wrapping a fully-constructed [`AppContext`] whose catalog
/// and images live under a temp directory.
pub struct TestHarness {
    pub ctx: AppContext,
    pub dir: TempDir,
}

impl TestHarness {
    /// Create a new harness with default configuration (JSON backend).
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Create a new harness using the given storage backend.
    pub fn with_backend(backend: StorageBackend) -> Self {
        let mut config = Config::default();
        config.storage.backend = backend;
        Self::with_config(config)
    }

    /// Create a new harness with a custom configuration. Storage paths are
    /// redirected into a temp directory.
    pub fn with_config(mut config: Config) -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        config.storage.catalog_path = dir.path().join("data/items.json");
        config.storage.db_path = dir.path().join("data/catalog.db");
        config.storage.images_dir = dir.path().join("data/images");

        let ctx = AppContext::from_config(config).expect("failed to build context");
        Self { ctx, dir }
    }

    /// Start an Axum server on a random port and return the harness together
    /// with the bound socket address.
    pub async fn with_server() -> (Self, SocketAddr) {
        Self::with_server_config(Config::default()).await
    }

    /// Start an Axum server with custom config on a random port.
    pub async fn with_server_config(config: Config) -> (Self, SocketAddr) {
        let harness = Self::with_config(config);
        let app = build_router(harness.ctx.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind random port");
        let addr = listener.local_addr().expect("failed to get local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        (harness, addr)
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.ctx.config.storage.catalog_path.clone()
    }

    pub fn images_dir(&self) -> PathBuf {
        self.ctx.config.storage.images_dir.clone()
    }
}

/// Multipart form for `POST /items`.
pub fn item_form(name: &str, category: &str, image: Option<(&[u8], &str)>) -> reqwest::multipart::Form {
    let form = reqwest::multipart::Form::new()
        .text("name", name.to_string())
        .text("category", category.to_string());
    match image {
        Some((bytes, file_name)) => form.part(
            "image",
            reqwest::multipart::Part::bytes(bytes.to_vec()).file_name(file_name.to_string()),
        ),
        None => form,
    }
}

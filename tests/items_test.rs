//! HTTP tests for the item, search, and image endpoints.

mod common;

use catalog_core::config::{Config, StorageBackend};
use catalog_core::CatalogStore;
use catalog_storage::images::compute_hash;
use catalog_storage::JsonCatalogStore;
use common::{item_form, TestHarness};

async fn post_item(
    client: &reqwest::Client,
    addr: std::net::SocketAddr,
    form: reqwest::multipart::Form,
) -> reqwest::Response {
    client
        .post(format!("http://{addr}/items"))
        .multipart(form)
        .send()
        .await
        .unwrap()
}

async fn list(client: &reqwest::Client, addr: std::net::SocketAddr) -> Vec<serde_json::Value> {
    let body: serde_json::Value = client
        .get(format!("http://{addr}/items"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    body["items"].as_array().unwrap().clone()
}

#[tokio::test]
async fn list_items_empty() {
    let (_h, addr) = TestHarness::with_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .get(format!("http://{addr}/items"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert!(resp.headers().contains_key("x-request-id"));
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body, serde_json::json!({"items": []}));
}

#[tokio::test]
async fn client_request_id_is_echoed() {
    let (_h, addr) = TestHarness::with_server().await;

    let resp = reqwest::Client::new()
        .get(format!("http://{addr}/items"))
        .header("x-request-id", "trace-42")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers()["x-request-id"], "trace-42");
}

#[tokio::test]
async fn create_then_get_item() {
    let (_h, addr) = TestHarness::with_server().await;
    let client = reqwest::Client::new();

    let resp = post_item(
        &client,
        addr,
        item_form("Shoe", "Fashion", Some((b"fake jpeg", "shoe.jpg"))),
    )
    .await;
    assert_eq!(resp.status(), 201);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "item received: Shoe");

    let items = list(&client, addr).await;
    assert_eq!(items.len(), 1);
    let id = items[0]["id"].as_str().unwrap();
    assert_eq!(items[0]["name"], "Shoe");
    assert_eq!(items[0]["category"], "Fashion");
    assert!(items[0]["image_name"].as_str().unwrap().ends_with(".jpg"));

    let resp = client
        .get(format!("http://{addr}/items/{id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let item: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(item, items[0]);
}

#[tokio::test]
async fn get_unknown_item_is_404() {
    let (_h, addr) = TestHarness::with_server().await;
    let resp = reqwest::get(format!("http://{addr}/items/nonexistent"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["code"], "not_found");
}

#[tokio::test]
async fn create_without_image_is_400_by_default() {
    let (_h, addr) = TestHarness::with_server().await;
    let client = reqwest::Client::new();

    let resp = post_item(&client, addr, item_form("Shoe", "Fashion", None)).await;
    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["code"], "invalid_argument");
    assert!(list(&client, addr).await.is_empty());
}

#[tokio::test]
async fn create_without_image_when_optional() {
    let mut config = Config::default();
    config.catalog.require_image = false;
    let (_h, addr) = TestHarness::with_server_config(config).await;
    let client = reqwest::Client::new();

    let resp = post_item(&client, addr, item_form("Mug", "Kitchen", None)).await;
    assert_eq!(resp.status(), 201);

    let items = list(&client, addr).await;
    assert_eq!(items.len(), 1);
    assert!(items[0].get("image_name").is_none());
}

#[tokio::test]
async fn empty_file_with_a_name_is_an_image() {
    let (_h, addr) = TestHarness::with_server().await;
    let client = reqwest::Client::new();

    let resp = post_item(&client, addr, item_form("Blank", "Misc", Some((b"", "photo")))).await;
    assert_eq!(resp.status(), 201);

    let items = list(&client, addr).await;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["image_name"], compute_hash(b""));
}

#[tokio::test]
async fn image_part_without_file_name_is_not_an_image() {
    let (_h, addr) = TestHarness::with_server().await;
    let client = reqwest::Client::new();

    let form = item_form("Shoe", "Fashion", None).text("image", "shoe.jpg");
    let resp = post_item(&client, addr, form).await;
    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["code"], "invalid_argument");
    assert!(list(&client, addr).await.is_empty());
}

#[tokio::test]
async fn identical_uploads_share_image_name() {
    let (_h, addr) = TestHarness::with_server().await;
    let client = reqwest::Client::new();

    post_item(&client, addr, item_form("Shoe", "Fashion", Some((b"same", "a.png")))).await;
    post_item(&client, addr, item_form("Boot", "Fashion", Some((b"same", "b.png")))).await;

    let items = list(&client, addr).await;
    assert_eq!(items.len(), 2);
    assert_ne!(items[0]["id"], items[1]["id"]);
    assert_eq!(items[0]["image_name"], items[1]["image_name"]);
}

#[tokio::test]
async fn stored_image_is_served() {
    let (h, addr) = TestHarness::with_server().await;
    let client = reqwest::Client::new();

    post_item(&client, addr, item_form("Shoe", "Fashion", Some((b"png bytes", "shoe.png")))).await;
    let items = list(&client, addr).await;
    let image_name = items[0]["image_name"].as_str().unwrap().to_string();
    assert!(h.images_dir().join(&image_name).is_file());

    let resp = client
        .get(format!("http://{addr}/images/{image_name}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers()["content-type"], "image/png");
    assert_eq!(resp.bytes().await.unwrap().as_ref(), b"png bytes");

    let missing = client
        .get(format!("http://{addr}/images/{}.png", "0".repeat(64)))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), 404);
}

#[tokio::test]
async fn search_items_by_keyword() {
    let (_h, addr) = TestHarness::with_server().await;
    let client = reqwest::Client::new();

    post_item(&client, addr, item_form("Shoe", "Fashion", Some((b"1", "1.jpg")))).await;
    post_item(&client, addr, item_form("Book", "Media", Some((b"2", "2.jpg")))).await;

    let body: serde_json::Value = client
        .get(format!("http://{addr}/search?keyword=Sho"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let hits = body["items"].as_array().unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["name"], "Shoe");

    let body: serde_json::Value = client
        .get(format!("http://{addr}/search?keyword=Media"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["items"][0]["name"], "Book");

    let body: serde_json::Value = client
        .get(format!("http://{addr}/search?keyword=xyz"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body, serde_json::json!({"items": []}));

    let resp = client
        .get(format!("http://{addr}/search"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn sqlite_backend_serves_the_same_api() {
    let mut config = Config::default();
    config.storage.backend = StorageBackend::Sqlite;
    let (h, addr) = TestHarness::with_server_config(config).await;
    let client = reqwest::Client::new();

    let resp = post_item(&client, addr, item_form("Shoe", "Fashion", Some((b"x", "s.jpg")))).await;
    assert_eq!(resp.status(), 201);
    post_item(&client, addr, item_form("Book", "Media", Some((b"y", "b.jpg")))).await;

    let items = list(&client, addr).await;
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["name"], "Shoe");

    let body: serde_json::Value = client
        .get(format!("http://{addr}/search?keyword=Boo"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["items"].as_array().unwrap().len(), 1);

    let health: serde_json::Value = client
        .get(format!("http://{addr}/health"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["backend"], "sqlite");
    assert!(!h.catalog_path().exists());
}

#[tokio::test]
async fn items_persist_in_the_catalog_document() {
    let (h, addr) = TestHarness::with_server().await;
    let client = reqwest::Client::new();

    post_item(&client, addr, item_form("Shoe", "Fashion", Some((b"x", "s.jpg")))).await;

    // A fresh store over the same document sees what the server wrote.
    let store = JsonCatalogStore::open(h.catalog_path()).unwrap();
    let catalog = store.load().unwrap();
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog.items[0].name, "Shoe");
}

#[tokio::test]
async fn corrupt_document_yields_500_and_is_preserved() {
    let (h, addr) = TestHarness::with_server().await;
    std::fs::write(h.catalog_path(), "not json at all").unwrap();
    let client = reqwest::Client::new();

    let resp = client
        .get(format!("http://{addr}/items"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 500);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["code"], "corrupt_data");

    let resp = post_item(&client, addr, item_form("Shoe", "Fashion", Some((b"x", "s.jpg")))).await;
    assert_eq!(resp.status(), 500);
    assert_eq!(
        std::fs::read_to_string(h.catalog_path()).unwrap(),
        "not json at all"
    );
}

#[tokio::test]
async fn oversized_upload_is_rejected() {
    let mut config = Config::default();
    config.catalog.max_upload_bytes = 1024;
    let (_h, addr) = TestHarness::with_server_config(config).await;
    let client = reqwest::Client::new();

    let big = vec![7u8; 8 * 1024];
    let resp = post_item(&client, addr, item_form("Big", "Misc", Some((&big, "big.jpg")))).await;
    assert_eq!(resp.status(), 413);
    assert!(list(&client, addr).await.is_empty());
}

#[tokio::test]
async fn concurrent_posts_are_all_kept() {
    let (_h, addr) = TestHarness::with_server().await;
    let client = reqwest::Client::new();

    let mut tasks = Vec::new();
    for n in 0..20 {
        let client = client.clone();
        tasks.push(tokio::spawn(async move {
            let content = format!("image-{n}");
            let resp = post_item(
                &client,
                addr,
                item_form(&format!("item-{n}"), "Misc", Some((content.as_bytes(), "i.jpg"))),
            )
            .await;
            assert_eq!(resp.status(), 201);
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    assert_eq!(list(&client, addr).await.len(), 20);
}

//! Axum router construction.
//!
//! Builds the application router with every route, the middleware layers,
//! and the OpenAPI/Swagger UI endpoints.

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::context::AppContext;
use crate::middleware::request_id::request_id_middleware;
use crate::routes;

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::health::health_check,
        routes::items::list_items,
        routes::items::create_item,
        routes::items::get_item,
        routes::search::search_items,
        routes::images::get_image,
    ),
    components(schemas(
        catalog_core::Item,
        catalog_core::Catalog,
        catalog_core::ItemId,
        routes::items::CreateItemForm,
        routes::items::CreateItemResponse,
        routes::health::HealthResponse,
    ))
)]
struct ApiDoc;

/// Build the complete Axum router.
pub fn build_router(ctx: AppContext) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let max_upload_bytes = ctx.config.catalog.max_upload_bytes;

    Router::new()
        .route("/health", get(routes::health::health_check))
        .route(
            "/items",
            get(routes::items::list_items).post(routes::items::create_item),
        )
        .route("/items/{item_id}", get(routes::items::get_item))
        .route("/search", get(routes::search::search_items))
        .route("/images/{image_name}", get(routes::images::get_image))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

//! Keyword search route handler.

use axum::extract::{Query, State};
use axum::Json;
use catalog_core::Catalog;
use serde::Deserialize;

use crate::context::AppContext;
use crate::error::AppError;

/// Query parameters for `/search`.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct SearchParams {
    /// Case-sensitive substring matched against name and category.
    pub keyword: Option<String>,
}

/// GET /search?keyword=...
#[utoipa::path(
    get,
    path = "/search",
    params(SearchParams),
    responses(
        (status = 200, description = "Matching items", body = Catalog),
        (status = 400, description = "Missing or empty keyword")
    )
)]
pub async fn search_items(
    State(ctx): State<AppContext>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Catalog>, AppError> {
    let keyword = params.keyword.unwrap_or_default();
    let items = ctx.service.search_items(&keyword)?;
    tracing::debug!(keyword = %keyword, hits = items.len(), "Search");
    Ok(Json(Catalog::new(items)))
}

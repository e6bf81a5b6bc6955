//! Item route handlers.

use axum::extract::multipart::{Multipart, MultipartError, MultipartRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use catalog_core::{Catalog, Error, Item};
use catalog_storage::extension_of;
use serde::Serialize;

use crate::context::AppContext;
use crate::error::AppError;
use crate::service::{ImageUpload, NewItem};

/// Multipart form accepted by `POST /items`. Documentation only.
#[derive(utoipa::ToSchema)]
#[allow(dead_code)]
pub struct CreateItemForm {
    name: String,
    category: String,
    /// Image file; its extension is kept on the stored key.
    #[schema(value_type = String, format = Binary)]
    image: Vec<u8>,
}

/// Acknowledgement returned by `POST /items`.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct CreateItemResponse {
    pub message: String,
}

/// GET /items
#[utoipa::path(
    get,
    path = "/items",
    responses(
        (status = 200, description = "Every item in insertion order", body = Catalog)
    )
)]
pub async fn list_items(State(ctx): State<AppContext>) -> Result<Json<Catalog>, AppError> {
    Ok(Json(ctx.service.list_items()?))
}

/// POST /items
#[utoipa::path(
    post,
    path = "/items",
    request_body(content = CreateItemForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Item stored", body = CreateItemResponse),
        (status = 400, description = "Malformed form or missing image")
    )
)]
pub async fn create_item(
    State(ctx): State<AppContext>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<CreateItemResponse>), AppError> {
    let mut multipart = multipart.map_err(|e| {
        AppError::new(Error::InvalidArgument(e.body_text())).with_status(e.status())
    })?;

    let mut new_item = NewItem {
        name: String::new(),
        category: String::new(),
        image: None,
    };

    while let Some(field) = multipart.next_field().await.map_err(form_error)? {
        let field_name = field.name().map(str::to_owned);
        match field_name.as_deref() {
            Some("name") => new_item.name = field.text().await.map_err(form_error)?,
            Some("category") => new_item.category = field.text().await.map_err(form_error)?,
            Some("image") => {
                // A part without a file name is not a file; browsers send one
                // with `filename=""` when nothing was chosen.
                let Some(file_name) = field.file_name().filter(|n| !n.is_empty()) else {
                    tracing::debug!("Ignoring image part without a file name");
                    continue;
                };
                let ext = extension_of(file_name);
                let content = field.bytes().await.map_err(form_error)?;
                new_item.image = Some(ImageUpload { content, ext });
            }
            other => tracing::debug!(field = ?other, "Ignoring unknown form field"),
        }
    }

    let item = ctx.service.create_item(new_item)?;

    Ok((
        StatusCode::CREATED,
        Json(CreateItemResponse {
            message: format!("item received: {}", item.name),
        }),
    ))
}

/// GET /items/{item_id}
#[utoipa::path(
    get,
    path = "/items/{item_id}",
    params(("item_id" = String, Path, description = "Item ID")),
    responses(
        (status = 200, description = "Item found", body = Item),
        (status = 404, description = "Item not found")
    )
)]
pub async fn get_item(
    State(ctx): State<AppContext>,
    Path(item_id): Path<String>,
) -> Result<Json<Item>, AppError> {
    Ok(Json(ctx.service.get_item(&item_id)?))
}

fn form_error(e: MultipartError) -> AppError {
    AppError::new(Error::InvalidArgument(e.body_text())).with_status(e.status())
}

//! Image serving route handler.

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;

use crate::context::AppContext;
use crate::error::AppError;

/// GET /images/{image_name}
#[utoipa::path(
    get,
    path = "/images/{image_name}",
    params(("image_name" = String, Path, description = "Stored image key")),
    responses(
        (status = 200, description = "Image bytes"),
        (status = 404, description = "No such image")
    )
)]
pub async fn get_image(
    State(ctx): State<AppContext>,
    Path(image_name): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let data = ctx.service.images().get(&image_name)?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type_for(&image_name)),
            // Keys are content hashes, so a given URL never changes.
            (header::CACHE_CONTROL, "public, max-age=31536000, immutable"),
        ],
        data,
    ))
}

fn content_type_for(key: &str) -> &'static str {
    let ext = key.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase());
    match ext.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

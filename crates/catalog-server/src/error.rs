//! Error-to-HTTP response conversion.
//!
//! Implements `IntoResponse` for [`catalog_core::Error`] so that route
//! handlers can return `Result<T, AppError>` and use `?` on service calls.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Wrapper so we can implement `IntoResponse` for an external type.
pub struct AppError {
    inner: catalog_core::Error,
    status: Option<StatusCode>,
}

impl AppError {
    pub fn new(inner: catalog_core::Error) -> Self {
        Self {
            inner,
            status: None,
        }
    }

    /// Override the status derived from the inner error.
    ///
    /// Used where the transport layer knows better, e.g. an oversized body
    /// that surfaces as a malformed form.
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = Some(status);
        self
    }

    pub fn inner(&self) -> &catalog_core::Error {
        &self.inner
    }
}

impl From<catalog_core::Error> for AppError {
    fn from(e: catalog_core::Error) -> Self {
        Self::new(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status.unwrap_or_else(|| {
            StatusCode::from_u16(self.inner.http_status())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
        });

        if status.is_server_error() {
            tracing::error!(
                status = %status,
                error = %self.inner,
                "Server error in API handler"
            );
        } else {
            tracing::debug!(status = %status, error = %self.inner, "Request rejected");
        }

        let body = json!({
            "error": self.inner.to_string(),
            "code": self.inner.code(),
        });

        (status, axum::Json(body)).into_response()
    }
}

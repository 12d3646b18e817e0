pub mod products;

use axum::{
    http::{header, HeaderMap, StatusCode, Uri},
    Json,
};
use serde_json::json;
use tracing::{error, warn};

use crate::error::{AppError, AppResult};

pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::OK, Json(json!({ "status": 200, "message": "OK" })))
}

pub async fn not_found(uri: Uri) -> AppError {
    warn!(path = %uri.path(), "No route matched");
    AppError::NotFound(format!("{} was not found on this server", uri.path()))
}

/// Reject a request unless its `Content-Type` is exactly `expected`.
pub fn check_content_type(headers: &HeaderMap, expected: &str) -> AppResult<()> {
    let Some(value) = headers.get(header::CONTENT_TYPE) else {
        error!("No Content-Type specified.");
        return Err(AppError::UnsupportedMediaType(format!(
            "Content-Type must be {expected}"
        )));
    };

    if value.as_bytes() == expected.as_bytes() {
        return Ok(());
    }

    error!(content_type = ?value, "Invalid Content-Type");
    Err(AppError::UnsupportedMediaType(format!(
        "Content-Type must be {expected}"
    )))
}

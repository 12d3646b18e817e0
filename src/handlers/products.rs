use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequestParts, Path, Query, State},
    http::{header, request::Parts, HeaderMap, HeaderName, StatusCode},
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::{
    error::{AppError, AppResult, ValidationError},
    handlers::check_content_type,
    models::{parse_price, Category, Product},
    AppState,
};

const JSON_CONTENT_TYPE: &str = "application/json";

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub name: Option<String>,
    pub category: Option<String>,
    pub available: Option<String>,
    pub price: Option<String>,
}

/// `{id}` path segment. Rejections use the JSON error body instead of axum's
/// plain-text one.
#[derive(Debug, Clone, Copy)]
pub struct ProductId(pub i32);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for ProductId {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i32>::from_request_parts(parts, state)
            .await
            .inspect_err(|rejection| warn!(%rejection, "Invalid product id"))?;
        Ok(Self(id))
    }
}

fn parse_body(body: &Bytes) -> AppResult<Value> {
    serde_json::from_slice(body).map_err(|err| {
        warn!(%err, "Request body is not valid JSON");
        AppError::BadRequest(format!("Invalid JSON body: {err}"))
    })
}

/// Accepts `true/false`, `1/0` and `yes/no`, ignoring case.
fn parse_flag(raw: &str) -> AppResult<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(AppError::BadRequest(format!(
            "Invalid value for available: {raw:?}"
        ))),
    }
}

fn not_found(id: i32) -> AppError {
    AppError::NotFound(format!("Product with id: {id} does not exist"))
}

/// Absolute when the request named a host, otherwise a path.
fn product_location(headers: &HeaderMap, id: i32) -> String {
    match headers.get(header::HOST).and_then(|h| h.to_str().ok()) {
        Some(host) => format!("http://{host}/products/{id}"),
        None => format!("/products/{id}"),
    }
}

// ── Create ────────────────────────────────────────────────────────────────────

pub async fn create_product(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<(StatusCode, [(HeaderName, String); 1], Json<Product>)> {
    info!("Request to create a product");
    check_content_type(&headers, JSON_CONTENT_TYPE)?;

    let payload = parse_body(&body)?;
    let mut product = Product::from_payload(&payload).inspect_err(|err| {
        warn!(%err, "Rejected product payload");
    })?;
    state.store.create(&mut product).await?;

    let id = product.id.ok_or_else(|| anyhow::anyhow!("store did not assign an id"))?;
    info!(id, "Product saved");

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, product_location(&headers, id))],
        Json(product),
    ))
}

// ── List ──────────────────────────────────────────────────────────────────────

pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<Vec<Product>>> {
    info!(?params, "Request to list products");

    let products = if let Some(name) = &params.name {
        state.store.find_by_name(name).await?
    } else if let Some(raw) = &params.category {
        let category = raw.parse::<Category>().map_err(ValidationError::from)?;
        state.store.find_by_category(category).await?
    } else if let Some(raw) = &params.available {
        state.store.find_by_availability(parse_flag(raw)?).await?
    } else if let Some(raw) = &params.price {
        let price = parse_price(&Value::String(raw.clone()))?;
        state.store.find_by_price(price).await?
    } else {
        state.store.all().await?
    };

    info!(count = products.len(), "Listed products");
    Ok(Json(products))
}

// ── Read ──────────────────────────────────────────────────────────────────────

pub async fn get_product(
    State(state): State<AppState>,
    ProductId(id): ProductId,
) -> AppResult<Json<Product>> {
    info!(id, "Request to read a product");
    let product = state.store.find(id).await?.ok_or_else(|| not_found(id))?;
    Ok(Json(product))
}

// ── Update ────────────────────────────────────────────────────────────────────

pub async fn update_product(
    State(state): State<AppState>,
    ProductId(id): ProductId,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<Json<Product>> {
    info!(id, "Request to update a product");
    check_content_type(&headers, JSON_CONTENT_TYPE)?;

    let payload = parse_body(&body)?;
    let mut product = state.store.find(id).await?.ok_or_else(|| not_found(id))?;
    product.apply_payload(&payload).inspect_err(|err| {
        warn!(id, %err, "Rejected product payload");
    })?;
    state.store.update(&mut product).await?;

    Ok(Json(product))
}

// ── Delete ────────────────────────────────────────────────────────────────────

pub async fn delete_product(
    State(state): State<AppState>,
    ProductId(id): ProductId,
) -> AppResult<StatusCode> {
    info!(id, "Request to delete a product");
    let product = state.store.find(id).await?.ok_or_else(|| not_found(id))?;
    state.store.delete(&product).await?;
    Ok(StatusCode::NO_CONTENT)
}

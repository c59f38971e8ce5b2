//! Product CRUD route handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::AppState;

use super::queries;
use super::requests::{CreateProductRequest, ListProductsQuery, UpdateProductRequest};
use super::responses::{ProductListResponse, ProductResponse};

/// Routes served by the products module.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/products", get(list).post(create))
        .route("/products/:id", get(detail).put(update).delete(remove))
}

/// Create a new product.
async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>)> {
    let product = queries::create_product(&state.db, &request).await?;
    tracing::info!(product_id = product.id, name = %product.name, "product created");

    state
        .cache
        .products
        .insert(product.id, Arc::new(product.clone()))
        .await;

    Ok((StatusCode::CREATED, Json(product.try_into()?)))
}

/// List products with pagination and optional filters.
async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListProductsQuery>,
) -> Result<Json<ProductListResponse>> {
    let (limit, skip) = query.normalized();
    let category = query.category.as_deref();
    let search = query.search.as_deref();

    let products = queries::list_products(&state.db, category, search, limit, skip).await?;
    let total = queries::count_products(&state.db, category, search).await?;

    let products = products
        .into_iter()
        .map(ProductResponse::try_from)
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(Json(ProductListResponse {
        total,
        skip,
        limit,
        products,
    }))
}

/// Get a product by id.
async fn detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ProductResponse>> {
    let product = if let Some(cached) = state.cache.products.get(&id).await {
        (*cached).clone()
    } else {
        let product = queries::get_product(&state.db, id)
            .await?
            .ok_or(AppError::NotFound)?;
        state
            .cache
            .products
            .insert(id, Arc::new(product.clone()))
            .await;
        product
    };

    Ok(Json(product.try_into()?))
}

/// Partially update a product.
async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateProductRequest>,
) -> Result<Json<ProductResponse>> {
    let product = queries::update_product(&state.db, id, &request)
        .await?
        .ok_or(AppError::NotFound)?;
    tracing::info!(product_id = id, "product updated");

    // Replace the stale cached row.
    state
        .cache
        .products
        .insert(id, Arc::new(product.clone()))
        .await;

    Ok(Json(product.try_into()?))
}

/// Delete a product.
async fn remove(State(state): State<AppState>, Path(id): Path<i64>) -> Result<StatusCode> {
    if !queries::delete_product(&state.db, id).await? {
        return Err(AppError::NotFound);
    }
    tracing::info!(product_id = id, "product deleted");

    state.cache.products.invalidate(&id).await;

    Ok(StatusCode::NO_CONTENT)
}

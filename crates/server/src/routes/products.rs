//! Catalog route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use validator::Validate;

use stitchline_core::ProductId;

use crate::db::ProductRepository;
use crate::error::AppError;
use crate::models::product::{
    CreateProductRequest, CreateVariantRequest, FeaturedQuery, Product, ProductFilter,
    ProductVariant, ProductWithVariants, SearchQuery,
};
use crate::state::AppState;

/// Create a new product.
///
/// POST /products
///
/// # Errors
///
/// Returns `AppError::Validation` for malformed input.
pub async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<Product>), AppError> {
    payload.validate()?;

    let product = ProductRepository::new(state.pool())
        .create_product(&payload)
        .await?;

    tracing::info!(product_id = %product.id, "product created");
    Ok((StatusCode::CREATED, Json(product)))
}

/// Create a variant under a product.
///
/// POST /products/{id}/variants
///
/// # Errors
///
/// Returns `AppError::NotFound` if the product does not exist and
/// `AppError::Conflict` if the SKU is already taken.
pub async fn create_variant(
    State(state): State<AppState>,
    Path(product_id): Path<ProductId>,
    Json(payload): Json<CreateVariantRequest>,
) -> Result<(StatusCode, Json<ProductVariant>), AppError> {
    payload.validate()?;

    let variant = ProductRepository::new(state.pool())
        .create_variant(product_id, &payload)
        .await?;

    tracing::info!(variant_id = %variant.id, sku = %variant.sku, "variant created");
    Ok((StatusCode::CREATED, Json(variant)))
}

/// Get a product with its variants.
///
/// GET /products/{id}
///
/// # Errors
///
/// Returns `AppError::NotFound` if the product does not exist.
pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<ProductId>,
) -> Result<Json<ProductWithVariants>, AppError> {
    let product = ProductRepository::new(state.pool())
        .get_with_variants(product_id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(product))
}

/// List active products with optional filters.
///
/// GET /products?category=&is_featured=&limit=&offset=
///
/// # Errors
///
/// Returns `AppError::Validation` for out-of-range pagination.
pub async fn list_products(
    State(state): State<AppState>,
    Query(filter): Query<ProductFilter>,
) -> Result<Json<Vec<Product>>, AppError> {
    filter.validate()?;

    let products = ProductRepository::new(state.pool()).list(&filter).await?;
    Ok(Json(products))
}

/// Search active products by name/description substring.
///
/// GET /products/search?q=&limit=
///
/// # Errors
///
/// Returns `AppError::Validation` for an empty query.
pub async fn search_products(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Product>>, AppError> {
    query.validate()?;

    let products = ProductRepository::new(state.pool())
        .search(&query.q, query.limit)
        .await?;
    Ok(Json(products))
}

/// List featured, active products.
///
/// GET /products/featured?limit=
///
/// # Errors
///
/// Returns `AppError::Validation` for an out-of-range limit.
pub async fn featured_products(
    State(state): State<AppState>,
    Query(query): Query<FeaturedQuery>,
) -> Result<Json<Vec<Product>>, AppError> {
    query.validate()?;

    let products = ProductRepository::new(state.pool())
        .featured(query.limit)
        .await?;
    Ok(Json(products))
}

//! Cart route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use validator::Validate;

use stitchline_core::{CartItemId, UserId};

use crate::db::CartRepository;
use crate::error::AppError;
use crate::models::cart::{AddToCartRequest, CartItem, CartWithItems, UpdateCartItemRequest};
use crate::state::AppState;

/// Get the user's cart with resolved items, creating the cart lazily.
///
/// GET /users/{user_id}/cart
///
/// # Errors
///
/// Returns `AppError::Database` if a query fails.
pub async fn get_cart(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Result<Json<CartWithItems>, AppError> {
    let repo = CartRepository::new(state.pool());
    let cart = repo.get_or_create(user_id).await?;
    let items = repo.get_items(cart.id).await?;

    Ok(Json(CartWithItems { cart, items }))
}

/// Add a variant to the user's cart.
///
/// POST /users/{user_id}/cart/items
///
/// Increments the quantity if the variant is already in the cart.
///
/// # Errors
///
/// Returns `AppError::NotFound` for a missing variant and
/// `AppError::OutOfStock` if the combined quantity exceeds stock.
pub async fn add_to_cart(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    Json(payload): Json<AddToCartRequest>,
) -> Result<(StatusCode, Json<CartItem>), AppError> {
    payload.validate()?;

    let item = CartRepository::new(state.pool())
        .add_item(user_id, &payload)
        .await?;

    Ok((StatusCode::CREATED, Json(item)))
}

/// Change a cart line's quantity. Zero deletes the line.
///
/// PATCH /cart/items/{id}
///
/// # Errors
///
/// Returns `AppError::NotFound` for a missing line and
/// `AppError::OutOfStock` if the new quantity exceeds stock.
pub async fn update_cart_item(
    State(state): State<AppState>,
    Path(cart_item_id): Path<CartItemId>,
    Json(payload): Json<UpdateCartItemRequest>,
) -> Result<Response, AppError> {
    payload.validate()?;

    let item = CartRepository::new(state.pool())
        .update_item(cart_item_id, payload.quantity)
        .await?;

    Ok(match item {
        Some(item) => Json(item).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    })
}

/// Remove a cart line. Idempotent: removing an absent line is not an error.
///
/// DELETE /cart/items/{id}
///
/// # Errors
///
/// Returns `AppError::Database` if the query fails.
pub async fn remove_from_cart(
    State(state): State<AppState>,
    Path(cart_item_id): Path<CartItemId>,
) -> Result<StatusCode, AppError> {
    CartRepository::new(state.pool())
        .remove_item(cart_item_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

//! Order route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use validator::Validate;

use stitchline_core::{OrderId, UserId};

use crate::db::OrderRepository;
use crate::error::AppError;
use crate::models::order::{
    CreateOrderRequest, Order, OrderDetail, OrderListQuery, OrderWithItems,
    UpdateOrderStatusRequest,
};
use crate::state::AppState;

/// Create an order from an explicit item list.
///
/// POST /users/{user_id}/orders
///
/// The total is computed server-side from live prices; stock is checked and
/// decremented, and the ordered cart lines cleared, atomically.
///
/// # Errors
///
/// Returns `AppError::NotFound` if the user or a variant is missing and
/// `AppError::OutOfStock` if any line exceeds current stock.
pub async fn create_order(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    Json(payload): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderWithItems>), AppError> {
    payload.validate()?;

    let order = OrderRepository::new(state.pool())
        .create_order(user_id, &payload)
        .await?;

    tracing::info!(
        order_id = %order.order.id,
        user_id = %user_id,
        total = %order.order.total_amount,
        lines = order.items.len(),
        "order created"
    );
    Ok((StatusCode::CREATED, Json(order)))
}

/// Get an order with resolved items, scoped to its owner.
///
/// GET /users/{user_id}/orders/{order_id}
///
/// # Errors
///
/// Returns `AppError::NotFound` for a missing order or one belonging to a
/// different user - the two are indistinguishable.
pub async fn get_order(
    State(state): State<AppState>,
    Path((user_id, order_id)): Path<(UserId, OrderId)>,
) -> Result<Json<OrderDetail>, AppError> {
    let order = OrderRepository::new(state.pool())
        .get_by_id(order_id, user_id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(order))
}

/// List the user's orders newest-first.
///
/// GET /users/{user_id}/orders?limit=&offset=
///
/// # Errors
///
/// Returns `AppError::Validation` for out-of-range pagination.
pub async fn list_orders(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    Query(query): Query<OrderListQuery>,
) -> Result<Json<Vec<OrderDetail>>, AppError> {
    query.validate()?;

    let orders = OrderRepository::new(state.pool())
        .list_for_user(user_id, query.limit, query.offset)
        .await?;

    Ok(Json(orders))
}

/// Apply an order status transition.
///
/// PATCH /orders/{id}/status
///
/// # Errors
///
/// Returns `AppError::InvalidTransition` for an illegal transition; the
/// order is left unchanged.
pub async fn update_order_status(
    State(state): State<AppState>,
    Path(order_id): Path<OrderId>,
    Json(payload): Json<UpdateOrderStatusRequest>,
) -> Result<Json<Order>, AppError> {
    payload.validate()?;

    let order = OrderRepository::new(state.pool())
        .update_status(order_id, payload.status)
        .await?;

    tracing::info!(order_id = %order.id, status = %order.status, "order status updated");
    Ok(Json(order))
}

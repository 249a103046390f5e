//! Database operations for orders: the cart-to-order transition and the
//! status lifecycle.
//!
//! Order creation is the one multi-row transactional workflow in the
//! system. All referenced variant rows are locked up front (in ascending id
//! order, so concurrent orders cannot deadlock), every line is checked
//! against stock before anything is decremented, and the order insert, item
//! inserts, stock decrements and cart cleanup commit or roll back as one
//! unit.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use stitchline_core::{
    ClothingSize, OrderId, OrderItemId, OrderStatus, ProductId, UserId, VariantId,
};

use super::RepositoryError;
use crate::models::order::{
    CreateOrderRequest, Order, OrderDetail, OrderItem, OrderItemDetail, OrderLineRequest,
    OrderWithItems,
};

/// A variant row locked for the duration of the order transaction, with the
/// live price pulled from its product.
#[derive(Debug, sqlx::FromRow)]
struct LockedVariant {
    id: VariantId,
    stock_quantity: i32,
    price: Decimal,
}

/// One order line with its price snapshot resolved.
#[derive(Debug, PartialEq, Eq)]
struct PricedLine {
    variant_id: VariantId,
    quantity: i32,
    price: Decimal,
}

/// Collapse duplicate variant references in the input by summing their
/// quantities. The map's key order doubles as the row-lock order.
///
/// The sum saturates rather than wrapping, so a pathological input fails
/// the stock check as `OutOfStock` instead of slipping past it negative.
fn merge_lines(lines: &[OrderLineRequest]) -> BTreeMap<VariantId, i32> {
    let mut merged: BTreeMap<VariantId, i32> = BTreeMap::new();
    for line in lines {
        let entry = merged.entry(line.product_variant_id).or_insert(0);
        *entry = entry.saturating_add(line.quantity);
    }
    merged
}

/// Resolve every requested line against the locked variant rows.
///
/// Fails before any stock is touched: a missing variant aborts with
/// `NotFound`, an over-stock line with `OutOfStock`. On success returns the
/// priced lines and the authoritative order total.
fn price_lines(
    requested: &BTreeMap<VariantId, i32>,
    locked: &[LockedVariant],
) -> Result<(Vec<PricedLine>, Decimal), RepositoryError> {
    let by_id: HashMap<VariantId, &LockedVariant> =
        locked.iter().map(|v| (v.id, v)).collect();

    let mut lines = Vec::with_capacity(requested.len());
    let mut total = Decimal::ZERO;

    for (&variant_id, &quantity) in requested {
        let variant = by_id.get(&variant_id).ok_or(RepositoryError::NotFound)?;
        if quantity > variant.stock_quantity {
            return Err(RepositoryError::OutOfStock {
                variant_id,
                requested: quantity,
                available: variant.stock_quantity,
            });
        }
        total += variant.price * Decimal::from(quantity);
        lines.push(PricedLine {
            variant_id,
            quantity,
            price: variant.price,
        });
    }

    Ok((lines, total))
}

/// Internal row type for order lines joined through variant and product.
#[derive(Debug, sqlx::FromRow)]
struct OrderItemDetailRow {
    id: OrderItemId,
    order_id: OrderId,
    product_variant_id: VariantId,
    quantity: i32,
    price: Decimal,
    created_at: DateTime<Utc>,
    size: ClothingSize,
    color: String,
    sku: String,
    product_id: ProductId,
    product_name: String,
    image_url: String,
}

impl From<OrderItemDetailRow> for OrderItemDetail {
    fn from(row: OrderItemDetailRow) -> Self {
        Self {
            item: OrderItem {
                id: row.id,
                order_id: row.order_id,
                product_variant_id: row.product_variant_id,
                quantity: row.quantity,
                price: row.price,
                created_at: row.created_at,
            },
            size: row.size,
            color: row.color,
            sku: row.sku,
            product_id: row.product_id,
            product_name: row.product_name,
            image_url: row.image_url,
        }
    }
}

const ORDER_COLUMNS: &str = "id, user_id, total_amount, status, payment_status, \
                             shipping_address, billing_address, created_at, updated_at";

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create an order from an explicit item list.
    ///
    /// The input list is authoritative; the live cart is not re-read. After
    /// a successful commit, only the ordered variants' lines are removed
    /// from the user's cart - unrelated lines stay.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user or any referenced
    /// variant does not exist.
    /// Returns `RepositoryError::OutOfStock` if any line exceeds current
    /// stock; no stock is decremented in that case.
    /// Returns `RepositoryError::Database` for other database errors; the
    /// transaction rolls back fully.
    pub async fn create_order(
        &self,
        user_id: UserId,
        input: &CreateOrderRequest,
    ) -> Result<OrderWithItems, RepositoryError> {
        let requested = merge_lines(&input.cart_items);
        let variant_ids: Vec<i32> = requested.keys().map(|id| id.as_i32()).collect();

        let mut tx = self.pool.begin().await?;

        // Row locks serialize concurrent check-then-decrement on the same
        // variants. Ascending id order keeps lock acquisition deadlock-free.
        let locked = sqlx::query_as::<_, LockedVariant>(
            r"
            SELECT v.id, v.stock_quantity, p.price
            FROM product_variants v
            INNER JOIN products p ON p.id = v.product_id
            WHERE v.id = ANY($1)
            ORDER BY v.id
            FOR UPDATE OF v
            ",
        )
        .bind(&variant_ids)
        .fetch_all(&mut *tx)
        .await?;

        let (lines, total) = price_lines(&requested, &locked)?;

        let order = sqlx::query_as::<_, Order>(&format!(
            r"
            INSERT INTO orders (user_id, total_amount, shipping_address, billing_address)
            VALUES ($1, $2, $3, $4)
            RETURNING {ORDER_COLUMNS}
            "
        ))
        .bind(user_id)
        .bind(total)
        .bind(&input.shipping_address)
        .bind(&input.billing_address)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_foreign_key_violation()
            {
                return RepositoryError::NotFound;
            }
            RepositoryError::Database(e)
        })?;

        let mut items = Vec::with_capacity(lines.len());
        for line in &lines {
            let item = sqlx::query_as::<_, OrderItem>(
                r"
                INSERT INTO order_items (order_id, product_variant_id, quantity, price)
                VALUES ($1, $2, $3, $4)
                RETURNING id, order_id, product_variant_id, quantity, price, created_at
                ",
            )
            .bind(order.id)
            .bind(line.variant_id)
            .bind(line.quantity)
            .bind(line.price)
            .fetch_one(&mut *tx)
            .await?;
            items.push(item);

            sqlx::query(
                "UPDATE product_variants SET stock_quantity = stock_quantity - $2 WHERE id = $1",
            )
            .bind(line.variant_id)
            .bind(line.quantity)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query(
            r"
            DELETE FROM cart_items ci
            USING carts c
            WHERE ci.cart_id = c.id
              AND c.user_id = $1
              AND ci.product_variant_id = ANY($2)
            ",
        )
        .bind(user_id)
        .bind(&variant_ids)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(OrderWithItems { order, items })
    }

    /// Apply a status transition, validated against the transition table.
    ///
    /// Never touches `payment_status`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order does not exist.
    /// Returns `RepositoryError::InvalidTransition` for an illegal
    /// transition; the order is left unchanged.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_status(
        &self,
        order_id: OrderId,
        next: OrderStatus,
    ) -> Result<Order, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_scalar::<_, OrderStatus>(
            "SELECT status FROM orders WHERE id = $1 FOR UPDATE",
        )
        .bind(order_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        if !current.can_transition_to(next) {
            return Err(RepositoryError::InvalidTransition {
                from: current,
                to: next,
            });
        }

        let order = sqlx::query_as::<_, Order>(&format!(
            r"
            UPDATE orders
            SET status = $2
            WHERE id = $1
            RETURNING {ORDER_COLUMNS}
            "
        ))
        .bind(order_id)
        .bind(next)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(order)
    }

    /// Get an order with resolved items, scoped to its owner.
    ///
    /// A foreign user's order is indistinguishable from a missing one.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get_by_id(
        &self,
        order_id: OrderId,
        user_id: UserId,
    ) -> Result<Option<OrderDetail>, RepositoryError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            r"
            SELECT {ORDER_COLUMNS}
            FROM orders
            WHERE id = $1 AND user_id = $2
            "
        ))
        .bind(order_id)
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        let Some(order) = order else {
            return Ok(None);
        };

        let items = self.items_for_orders(&[order.id.as_i32()]).await?;
        let items = items.into_iter().map(Into::into).collect();

        Ok(Some(OrderDetail { order, items }))
    }

    /// List a user's orders newest-first, each with resolved items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list_for_user(
        &self,
        user_id: UserId,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<OrderDetail>, RepositoryError> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            r"
            SELECT {ORDER_COLUMNS}
            FROM orders
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "
        ))
        .bind(user_id)
        .bind(limit.unwrap_or(20))
        .bind(offset.unwrap_or(0))
        .fetch_all(self.pool)
        .await?;

        if orders.is_empty() {
            return Ok(Vec::new());
        }

        let order_ids: Vec<i32> = orders.iter().map(|o| o.id.as_i32()).collect();
        let rows = self.items_for_orders(&order_ids).await?;

        let mut by_order: HashMap<OrderId, Vec<OrderItemDetail>> = HashMap::new();
        for row in rows {
            by_order.entry(row.order_id).or_default().push(row.into());
        }

        Ok(orders
            .into_iter()
            .map(|order| {
                let items = by_order.remove(&order.id).unwrap_or_default();
                OrderDetail { order, items }
            })
            .collect())
    }

    async fn items_for_orders(
        &self,
        order_ids: &[i32],
    ) -> Result<Vec<OrderItemDetailRow>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderItemDetailRow>(
            r"
            SELECT oi.id, oi.order_id, oi.product_variant_id, oi.quantity,
                   oi.price, oi.created_at,
                   v.size, v.color, v.sku,
                   p.id AS product_id, p.name AS product_name, p.image_url
            FROM order_items oi
            INNER JOIN product_variants v ON v.id = oi.product_variant_id
            INNER JOIN products p ON p.id = v.product_id
            WHERE oi.order_id = ANY($1)
            ORDER BY oi.order_id, oi.id
            ",
        )
        .bind(order_ids)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(variant: i32, quantity: i32) -> OrderLineRequest {
        OrderLineRequest {
            product_variant_id: VariantId::new(variant),
            quantity,
        }
    }

    fn locked(id: i32, stock: i32, price_cents: i64) -> LockedVariant {
        LockedVariant {
            id: VariantId::new(id),
            stock_quantity: stock,
            price: Decimal::new(price_cents, 2),
        }
    }

    #[test]
    fn test_merge_lines_sums_duplicate_variants() {
        let merged = merge_lines(&[line(2, 1), line(1, 2), line(2, 3)]);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[&VariantId::new(1)], 2);
        assert_eq!(merged[&VariantId::new(2)], 4);
        // BTreeMap keys come out in ascending id order, the lock order
        let ids: Vec<_> = merged.keys().copied().collect();
        assert_eq!(ids, vec![VariantId::new(1), VariantId::new(2)]);
    }

    #[test]
    fn test_price_lines_computes_total_from_live_prices() {
        let requested = merge_lines(&[line(1, 2), line(2, 1)]);
        let locked = vec![locked(1, 10, 19_99), locked(2, 5, 45_00)];

        let (lines, total) = price_lines(&requested, &locked).expect("priced");
        assert_eq!(total, Decimal::new(84_98, 2)); // 2 * 19.99 + 45.00
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].price, Decimal::new(19_99, 2));
        assert_eq!(lines[0].quantity, 2);
    }

    #[test]
    fn test_price_lines_missing_variant_is_not_found() {
        let requested = merge_lines(&[line(1, 1), line(99, 1)]);
        let locked = vec![locked(1, 10, 19_99)];

        assert!(matches!(
            price_lines(&requested, &locked),
            Err(RepositoryError::NotFound)
        ));
    }

    #[test]
    fn test_price_lines_over_stock_fails_before_any_decrement() {
        let requested = merge_lines(&[line(1, 1), line(2, 6)]);
        let locked = vec![locked(1, 10, 19_99), locked(2, 5, 45_00)];

        match price_lines(&requested, &locked) {
            Err(RepositoryError::OutOfStock {
                variant_id,
                requested,
                available,
            }) => {
                assert_eq!(variant_id, VariantId::new(2));
                assert_eq!(requested, 6);
                assert_eq!(available, 5);
            }
            other => panic!("expected OutOfStock, got {other:?}"),
        }
    }

    #[test]
    fn test_price_lines_allows_exact_stock() {
        let requested = merge_lines(&[line(1, 5)]);
        let locked = vec![locked(1, 5, 10_00)];

        let (_, total) = price_lines(&requested, &locked).expect("priced");
        assert_eq!(total, Decimal::new(50_00, 2));
    }

    #[test]
    fn test_merge_lines_saturates_instead_of_wrapping() {
        let merged = merge_lines(&[line(1, i32::MAX), line(1, 1)]);
        assert_eq!(merged[&VariantId::new(1)], i32::MAX);

        // The saturated quantity still fails the stock check as a typed error
        let locked = vec![locked(1, 5, 10_00)];
        assert!(matches!(
            price_lines(&merged, &locked),
            Err(RepositoryError::OutOfStock { .. })
        ));
    }

    #[test]
    fn test_price_lines_merged_duplicates_checked_against_stock_once() {
        // 3 + 3 merged = 6 against stock 5 must fail even though each
        // individual line fits
        let requested = merge_lines(&[line(1, 3), line(1, 3)]);
        let locked = vec![locked(1, 5, 10_00)];

        assert!(matches!(
            price_lines(&requested, &locked),
            Err(RepositoryError::OutOfStock { .. })
        ));
    }
}

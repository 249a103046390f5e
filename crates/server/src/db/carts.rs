//! Database operations for carts and cart items.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use stitchline_core::{CartId, CartItemId, ClothingSize, ProductId, UserId, VariantId};

use super::RepositoryError;
use crate::models::cart::{AddToCartRequest, Cart, CartItem, CartItemDetail};

/// Internal row type for cart lines joined through variant and product.
#[derive(Debug, sqlx::FromRow)]
struct CartItemDetailRow {
    id: CartItemId,
    cart_id: CartId,
    product_variant_id: VariantId,
    quantity: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    size: ClothingSize,
    color: String,
    sku: String,
    stock_quantity: i32,
    product_id: ProductId,
    product_name: String,
    price: Decimal,
    image_url: String,
}

impl From<CartItemDetailRow> for CartItemDetail {
    fn from(row: CartItemDetailRow) -> Self {
        Self {
            item: CartItem {
                id: row.id,
                cart_id: row.cart_id,
                product_variant_id: row.product_variant_id,
                quantity: row.quantity,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
            size: row.size,
            color: row.color,
            sku: row.sku,
            stock_quantity: row.stock_quantity,
            product_id: row.product_id,
            product_name: row.product_name,
            price: row.price,
            image_url: row.image_url,
        }
    }
}

/// Repository for cart database operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get the user's cart, creating it lazily if absent.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get_or_create(&self, user_id: UserId) -> Result<Cart, RepositoryError> {
        if let Some(cart) = self.get_by_user(user_id).await? {
            return Ok(cart);
        }

        // ON CONFLICT DO NOTHING so a concurrent create wins cleanly; the
        // follow-up select picks up whichever row landed.
        let inserted = sqlx::query_as::<_, Cart>(
            r"
            INSERT INTO carts (user_id)
            VALUES ($1)
            ON CONFLICT (user_id) DO NOTHING
            RETURNING id, user_id, created_at, updated_at
            ",
        )
        .bind(user_id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_foreign_key_violation()
            {
                return RepositoryError::NotFound;
            }
            RepositoryError::Database(e)
        })?;

        if let Some(cart) = inserted {
            return Ok(cart);
        }

        self.get_by_user(user_id).await?.ok_or(RepositoryError::NotFound)
    }

    async fn get_by_user(&self, user_id: UserId) -> Result<Option<Cart>, RepositoryError> {
        let cart = sqlx::query_as::<_, Cart>(
            r"
            SELECT id, user_id, created_at, updated_at
            FROM carts
            WHERE user_id = $1
            ",
        )
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(cart)
    }

    /// Add a variant to the user's cart.
    ///
    /// If the variant is already in the cart, its quantity is incremented
    /// rather than duplicating the row. The stock check is best-effort at
    /// write time; nothing is reserved.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the variant does not exist.
    /// Returns `RepositoryError::OutOfStock` if the combined quantity would
    /// exceed current stock.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn add_item(
        &self,
        user_id: UserId,
        input: &AddToCartRequest,
    ) -> Result<CartItem, RepositoryError> {
        let stock = sqlx::query_scalar::<_, i32>(
            "SELECT stock_quantity FROM product_variants WHERE id = $1",
        )
        .bind(input.product_variant_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        let cart = self.get_or_create(user_id).await?;

        let existing = sqlx::query_scalar::<_, i32>(
            "SELECT quantity FROM cart_items WHERE cart_id = $1 AND product_variant_id = $2",
        )
        .bind(cart.id)
        .bind(input.product_variant_id)
        .fetch_optional(self.pool)
        .await?;

        let current = existing.unwrap_or(0);
        if current.checked_add(input.quantity).is_none_or(|q| q > stock) {
            return Err(RepositoryError::OutOfStock {
                variant_id: input.product_variant_id,
                requested: current.saturating_add(input.quantity),
                available: stock,
            });
        }

        // The upsert adds the increment in SQL rather than writing the
        // precomputed sum, so concurrent adds to the same line cannot lose
        // an increment.
        let item = sqlx::query_as::<_, CartItem>(
            r"
            INSERT INTO cart_items (cart_id, product_variant_id, quantity)
            VALUES ($1, $2, $3)
            ON CONFLICT (cart_id, product_variant_id)
            DO UPDATE SET quantity = cart_items.quantity + EXCLUDED.quantity
            RETURNING id, cart_id, product_variant_id, quantity, created_at, updated_at
            ",
        )
        .bind(cart.id)
        .bind(input.product_variant_id)
        .bind(input.quantity)
        .fetch_one(self.pool)
        .await?;

        Ok(item)
    }

    /// Set a cart line's quantity. Zero deletes the line.
    ///
    /// Returns `None` when the line was deleted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the line does not exist.
    /// Returns `RepositoryError::OutOfStock` if the new quantity exceeds
    /// current stock.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_item(
        &self,
        cart_item_id: CartItemId,
        quantity: i32,
    ) -> Result<Option<CartItem>, RepositoryError> {
        if quantity == 0 {
            let deleted = self.remove_item(cart_item_id).await?;
            if !deleted {
                return Err(RepositoryError::NotFound);
            }
            return Ok(None);
        }

        let line = sqlx::query_as::<_, (VariantId, i32)>(
            r"
            SELECT ci.product_variant_id, v.stock_quantity
            FROM cart_items ci
            INNER JOIN product_variants v ON v.id = ci.product_variant_id
            WHERE ci.id = $1
            ",
        )
        .bind(cart_item_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        let (variant_id, stock) = line;
        if quantity > stock {
            return Err(RepositoryError::OutOfStock {
                variant_id,
                requested: quantity,
                available: stock,
            });
        }

        let item = sqlx::query_as::<_, CartItem>(
            r"
            UPDATE cart_items
            SET quantity = $2
            WHERE id = $1
            RETURNING id, cart_id, product_variant_id, quantity, created_at, updated_at
            ",
        )
        .bind(cart_item_id)
        .bind(quantity)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(Some(item))
    }

    /// Remove a cart line. Idempotent.
    ///
    /// # Returns
    ///
    /// Returns `true` if a line was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn remove_item(&self, cart_item_id: CartItemId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM cart_items WHERE id = $1")
            .bind(cart_item_id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Fetch all lines of a cart, resolved through variant and product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_items(&self, cart_id: CartId) -> Result<Vec<CartItemDetail>, RepositoryError> {
        let rows = sqlx::query_as::<_, CartItemDetailRow>(
            r"
            SELECT ci.id, ci.cart_id, ci.product_variant_id, ci.quantity,
                   ci.created_at, ci.updated_at,
                   v.size, v.color, v.sku, v.stock_quantity,
                   p.id AS product_id, p.name AS product_name, p.price, p.image_url
            FROM cart_items ci
            INNER JOIN product_variants v ON v.id = ci.product_variant_id
            INNER JOIN products p ON p.id = v.product_id
            WHERE ci.cart_id = $1
            ORDER BY ci.id
            ",
        )
        .bind(cart_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

//! Cart domain models.
//!
//! Carts are transient working state: one per user, created lazily, and the
//! ordered lines are removed once an order is created from them.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use stitchline_core::{CartId, CartItemId, ClothingSize, ProductId, UserId, VariantId};

/// A user's shopping cart.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Cart {
    /// Unique cart ID.
    pub id: CartId,
    /// Owning user.
    pub user_id: UserId,
    /// When the cart was created.
    pub created_at: DateTime<Utc>,
    /// When the cart was last updated.
    pub updated_at: DateTime<Utc>,
}

/// A line in a cart, referencing one product variant.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CartItem {
    /// Unique cart item ID.
    pub id: CartItemId,
    /// Owning cart.
    pub cart_id: CartId,
    /// Variant this line refers to.
    pub product_variant_id: VariantId,
    /// Requested quantity. Checked against stock at write time, not reserved.
    pub quantity: i32,
    /// When the line was created.
    pub created_at: DateTime<Utc>,
    /// When the line was last updated.
    pub updated_at: DateTime<Utc>,
}

/// A cart line resolved through its variant and product, so callers get
/// price/name/image without a second query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItemDetail {
    /// The cart line itself.
    pub item: CartItem,
    /// Variant size.
    pub size: ClothingSize,
    /// Variant color.
    pub color: String,
    /// Variant SKU.
    pub sku: String,
    /// Current stock of the variant.
    pub stock_quantity: i32,
    /// Parent product ID.
    pub product_id: ProductId,
    /// Product name.
    pub product_name: String,
    /// Current product price.
    pub price: Decimal,
    /// Product image URL.
    pub image_url: String,
}

/// A cart with all lines resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartWithItems {
    /// The cart itself.
    pub cart: Cart,
    /// Resolved lines, in insertion order.
    pub items: Vec<CartItemDetail>,
}

/// Request payload for adding a variant to a cart.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddToCartRequest {
    pub product_variant_id: VariantId,
    #[validate(range(min = 1, max = 1_000_000))]
    pub quantity: i32,
}

/// Request payload for changing a cart line's quantity.
///
/// A quantity of zero deletes the line.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateCartItemRequest {
    #[validate(range(min = 0, max = 1_000_000))]
    pub quantity: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_to_cart_rejects_non_positive_quantity() {
        let req = AddToCartRequest {
            product_variant_id: VariantId::new(1),
            quantity: 0,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_add_to_cart_rejects_oversized_quantity() {
        let req = AddToCartRequest {
            product_variant_id: VariantId::new(1),
            quantity: 1_000_001,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_update_cart_item_allows_zero_quantity() {
        // Zero means delete the line
        let req = UpdateCartItemRequest { quantity: 0 };
        assert!(req.validate().is_ok());

        let req = UpdateCartItemRequest { quantity: -1 };
        assert!(req.validate().is_err());
    }
}

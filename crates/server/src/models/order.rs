//! Order domain models.
//!
//! Orders are permanent once created. Only `status`, `payment_status` and
//! `updated_at` mutate afterwards; `total_amount` and the item price
//! snapshots never change.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use stitchline_core::{
    ClothingSize, OrderId, OrderItemId, OrderStatus, PaymentStatus, ProductId, UserId, VariantId,
};

/// A placed order.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Order {
    /// Unique order ID.
    pub id: OrderId,
    /// Owning user.
    pub user_id: UserId,
    /// Authoritative total, computed server-side from live prices.
    pub total_amount: Decimal,
    /// Fulfillment status.
    pub status: OrderStatus,
    /// Payment status, driven by the external billing collaborator.
    pub payment_status: PaymentStatus,
    /// Shipping address, snapshotted as text at order time.
    pub shipping_address: String,
    /// Billing address, snapshotted as text at order time.
    pub billing_address: String,
    /// When the order was placed.
    pub created_at: DateTime<Utc>,
    /// When the order was last updated.
    pub updated_at: DateTime<Utc>,
}

/// A line in an order. `price` is frozen at order time.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct OrderItem {
    /// Unique order item ID.
    pub id: OrderItemId,
    /// Owning order.
    pub order_id: OrderId,
    /// Variant this line refers to.
    pub product_variant_id: VariantId,
    /// Ordered quantity.
    pub quantity: i32,
    /// Snapshot of the product price at order time.
    pub price: Decimal,
    /// When the line was created.
    pub created_at: DateTime<Utc>,
}

/// An order together with its plain item lines, as returned from creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderWithItems {
    /// The order itself.
    pub order: Order,
    /// Item lines with snapshot prices.
    pub items: Vec<OrderItem>,
}

/// An order line resolved through its variant and product for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemDetail {
    /// The order line itself.
    pub item: OrderItem,
    /// Variant size.
    pub size: ClothingSize,
    /// Variant color.
    pub color: String,
    /// Variant SKU.
    pub sku: String,
    /// Parent product ID.
    pub product_id: ProductId,
    /// Product name.
    pub product_name: String,
    /// Product image URL.
    pub image_url: String,
}

/// An order with resolved item lines, as returned from reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetail {
    /// The order itself.
    pub order: Order,
    /// Resolved item lines.
    pub items: Vec<OrderItemDetail>,
}

/// One requested line of a new order.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderLineRequest {
    pub product_variant_id: VariantId,
    #[validate(range(min = 1, max = 1_000_000))]
    pub quantity: i32,
}

/// Request payload for creating an order.
///
/// The item list is authoritative: the order is built from it, not re-read
/// from the live cart. Any client-sent total would be ignored; none is
/// accepted here at all.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateOrderRequest {
    #[validate(length(min = 1))]
    pub shipping_address: String,
    #[validate(length(min = 1))]
    pub billing_address: String,
    #[validate(length(min = 1, max = 100), nested)]
    pub cart_items: Vec<OrderLineRequest>,
}

/// Request payload for an order status transition.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}

/// Pagination for the per-user order listing.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct OrderListQuery {
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<i64>,
    #[validate(range(min = 0))]
    pub offset: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_order_request() -> CreateOrderRequest {
        CreateOrderRequest {
            shipping_address: "1 Mill Lane".to_string(),
            billing_address: "1 Mill Lane".to_string(),
            cart_items: vec![OrderLineRequest {
                product_variant_id: VariantId::new(1),
                quantity: 2,
            }],
        }
    }

    #[test]
    fn test_create_order_request_valid() {
        assert!(valid_order_request().validate().is_ok());
    }

    #[test]
    fn test_create_order_request_rejects_empty_lines() {
        let mut req = valid_order_request();
        req.cart_items.clear();
        let errs = req.validate().expect_err("empty line list must fail");
        assert!(errs.to_string().contains("cart_items"));
    }

    #[test]
    fn test_create_order_request_rejects_oversized_quantity() {
        let mut req = valid_order_request();
        req.cart_items[0].quantity = 1_000_001;
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_create_order_request_rejects_too_many_lines() {
        let mut req = valid_order_request();
        req.cart_items = (1..=101)
            .map(|id| OrderLineRequest {
                product_variant_id: VariantId::new(id),
                quantity: 1,
            })
            .collect();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_create_order_request_rejects_zero_quantity_line() {
        let mut req = valid_order_request();
        req.cart_items[0].quantity = 0;
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_create_order_request_rejects_blank_addresses() {
        let mut req = valid_order_request();
        req.shipping_address = String::new();
        assert!(req.validate().is_err());
    }
}

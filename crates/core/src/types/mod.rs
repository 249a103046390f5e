//! Shared type definitions.

pub mod catalog;
pub mod id;
pub mod status;

pub use catalog::{ClothingCategory, ClothingSize};
pub use id::{CartId, CartItemId, OrderId, OrderItemId, ProductId, UserId, VariantId};
pub use status::{OrderStatus, PaymentStatus};

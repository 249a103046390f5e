//! Catalog domain models: products and their size/color variants.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use stitchline_core::{ClothingCategory, ClothingSize, ProductId, VariantId};

use super::validate_money;

/// A clothing product. Pricing lives here; stock lives on the variants.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Long-form description.
    pub description: String,
    /// Clothing category.
    pub category: ClothingCategory,
    /// Unit price, exact to the cent.
    pub price: Decimal,
    /// Primary image URL.
    pub image_url: String,
    /// Shown in the featured listing.
    pub is_featured: bool,
    /// Inactive products are hidden from listing/search but stay
    /// retrievable by id for historical order display.
    pub is_active: bool,
    /// When the product was created.
    pub created_at: DateTime<Utc>,
    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

/// A specific size/color of a product - the actual sellable unit.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProductVariant {
    /// Unique variant ID.
    pub id: VariantId,
    /// Parent product.
    pub product_id: ProductId,
    /// Garment size.
    pub size: ClothingSize,
    /// Color, free text.
    pub color: String,
    /// Live stock counter, decremented by order creation.
    pub stock_quantity: i32,
    /// Globally unique stock-keeping unit.
    pub sku: String,
    /// When the variant was created.
    pub created_at: DateTime<Utc>,
    /// When the variant was last updated.
    pub updated_at: DateTime<Utc>,
}

/// A product together with all of its variants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductWithVariants {
    /// The product itself.
    pub product: Product,
    /// All variants, in insertion order.
    pub variants: Vec<ProductVariant>,
}

/// Request payload for creating a product.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 1))]
    pub description: String,
    pub category: ClothingCategory,
    #[validate(custom(function = validate_money))]
    pub price: Decimal,
    #[validate(url)]
    pub image_url: String,
    /// Defaults to false.
    pub is_featured: Option<bool>,
    /// Defaults to true.
    pub is_active: Option<bool>,
}

/// Request payload for creating a variant under a product.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateVariantRequest {
    pub size: ClothingSize,
    #[validate(length(min = 1, max = 100))]
    pub color: String,
    #[validate(range(min = 0))]
    pub stock_quantity: i32,
    #[validate(length(min = 1, max = 100))]
    pub sku: String,
}

/// Filter criteria for listing products.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ProductFilter {
    /// Filter by category.
    pub category: Option<ClothingCategory>,
    /// Filter by featured flag.
    pub is_featured: Option<bool>,
    /// Maximum number of results.
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<i64>,
    /// Number of results to skip.
    #[validate(range(min = 0))]
    pub offset: Option<i64>,
}

/// Query parameters for product search.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SearchQuery {
    /// Substring matched case-insensitively against name and description.
    #[validate(length(min = 1, max = 255))]
    pub q: String,
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<i64>,
}

/// Query parameters for the featured listing.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct FeaturedQuery {
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_product_request() -> CreateProductRequest {
        CreateProductRequest {
            name: "Boxy Tee".to_string(),
            description: "Heavyweight cotton".to_string(),
            category: ClothingCategory::TShirt,
            price: Decimal::new(2999, 2),
            image_url: "https://cdn.example.com/boxy-tee.jpg".to_string(),
            is_featured: None,
            is_active: None,
        }
    }

    #[test]
    fn test_create_product_request_valid() {
        assert!(valid_product_request().validate().is_ok());
    }

    #[test]
    fn test_create_product_request_rejects_empty_name() {
        let mut req = valid_product_request();
        req.name = String::new();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_create_product_request_rejects_bad_price() {
        let mut req = valid_product_request();
        req.price = Decimal::ZERO;
        assert!(req.validate().is_err());

        req.price = Decimal::new(12_345, 3); // 12.345
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_create_product_request_rejects_bad_url() {
        let mut req = valid_product_request();
        req.image_url = "not a url".to_string();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_create_variant_request_rejects_negative_stock() {
        let req = CreateVariantRequest {
            size: ClothingSize::M,
            color: "black".to_string(),
            stock_quantity: -1,
            sku: "TEE-BLK-M".to_string(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_product_filter_rejects_oversized_limit() {
        let filter = ProductFilter {
            limit: Some(500),
            ..ProductFilter::default()
        };
        assert!(filter.validate().is_err());
    }
}

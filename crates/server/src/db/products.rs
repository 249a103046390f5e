//! Database operations for the catalog: products and variants.

use sqlx::PgPool;

use stitchline_core::ProductId;

use super::RepositoryError;
use crate::models::product::{
    CreateProductRequest, CreateVariantRequest, Product, ProductFilter, ProductVariant,
    ProductWithVariants,
};

/// Escape `%` and `_` so user input matches literally inside an ILIKE
/// pattern (backslash is the default escape character in `PostgreSQL`).
fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Repository for catalog database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a new product.
    ///
    /// Omitted flags default to `is_featured = false`, `is_active = true`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create_product(
        &self,
        input: &CreateProductRequest,
    ) -> Result<Product, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(
            r"
            INSERT INTO products (name, description, category, price, image_url, is_featured, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, name, description, category, price, image_url,
                      is_featured, is_active, created_at, updated_at
            ",
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.category)
        .bind(input.price)
        .bind(&input.image_url)
        .bind(input.is_featured.unwrap_or(false))
        .bind(input.is_active.unwrap_or(true))
        .fetch_one(self.pool)
        .await?;

        Ok(product)
    }

    /// Create a variant under an existing product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    /// Returns `RepositoryError::Conflict` if the SKU is already taken.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create_variant(
        &self,
        product_id: ProductId,
        input: &CreateVariantRequest,
    ) -> Result<ProductVariant, RepositoryError> {
        let variant = sqlx::query_as::<_, ProductVariant>(
            r"
            INSERT INTO product_variants (product_id, size, color, stock_quantity, sku)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, product_id, size, color, stock_quantity, sku,
                      created_at, updated_at
            ",
        )
        .bind(product_id)
        .bind(input.size)
        .bind(&input.color)
        .bind(input.stock_quantity)
        .bind(&input.sku)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e {
                if db_err.is_unique_violation() {
                    return RepositoryError::Conflict(format!("SKU already exists: {}", input.sku));
                }
                if db_err.is_foreign_key_violation() {
                    return RepositoryError::NotFound;
                }
            }
            RepositoryError::Database(e)
        })?;

        Ok(variant)
    }

    /// Get a product with all of its variants.
    ///
    /// Inactive products are still returned here; only listing and search
    /// hide them.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get_with_variants(
        &self,
        id: ProductId,
    ) -> Result<Option<ProductWithVariants>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(
            r"
            SELECT id, name, description, category, price, image_url,
                   is_featured, is_active, created_at, updated_at
            FROM products
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        let Some(product) = product else {
            return Ok(None);
        };

        let variants = sqlx::query_as::<_, ProductVariant>(
            r"
            SELECT id, product_id, size, color, stock_quantity, sku,
                   created_at, updated_at
            FROM product_variants
            WHERE product_id = $1
            ORDER BY id
            ",
        )
        .bind(id)
        .fetch_all(self.pool)
        .await?;

        Ok(Some(ProductWithVariants { product, variants }))
    }

    /// List active products with optional category/featured filters.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>, RepositoryError> {
        let limit = filter.limit.unwrap_or(50);
        let offset = filter.offset.unwrap_or(0);

        let products = sqlx::query_as::<_, Product>(
            r"
            SELECT id, name, description, category, price, image_url,
                   is_featured, is_active, created_at, updated_at
            FROM products
            WHERE is_active
              AND ($1::clothing_category IS NULL OR category = $1)
              AND ($2::bool IS NULL OR is_featured = $2)
            ORDER BY created_at DESC, id DESC
            LIMIT $3 OFFSET $4
            ",
        )
        .bind(filter.category)
        .bind(filter.is_featured)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// Case-insensitive substring search over name and description.
    ///
    /// Only active products are searchable.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn search(
        &self,
        query: &str,
        limit: Option<i64>,
    ) -> Result<Vec<Product>, RepositoryError> {
        let pattern = format!("%{}%", escape_like(query));

        let products = sqlx::query_as::<_, Product>(
            r"
            SELECT id, name, description, category, price, image_url,
                   is_featured, is_active, created_at, updated_at
            FROM products
            WHERE is_active
              AND (name ILIKE $1 OR description ILIKE $1)
            ORDER BY created_at DESC, id DESC
            LIMIT $2
            ",
        )
        .bind(pattern)
        .bind(limit.unwrap_or(50))
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// List featured, active products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn featured(&self, limit: Option<i64>) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as::<_, Product>(
            r"
            SELECT id, name, description, category, price, image_url,
                   is_featured, is_active, created_at, updated_at
            FROM products
            WHERE is_featured AND is_active
            ORDER BY created_at DESC, id DESC
            LIMIT $1
            ",
        )
        .bind(limit.unwrap_or(20))
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like_passes_plain_text() {
        assert_eq!(escape_like("hoodie"), "hoodie");
    }

    #[test]
    fn test_escape_like_escapes_wildcards() {
        assert_eq!(escape_like("100%_cotton"), "100\\%\\_cotton");
        assert_eq!(escape_like("back\\slash"), "back\\\\slash");
    }
}

//! Database operations for `PostgreSQL`.
//!
//! ## Tables
//!
//! - `users` - Account records (written by the external auth collaborator)
//! - `products` / `product_variants` - Catalog
//! - `carts` / `cart_items` - Transient working state per user
//! - `orders` / `order_items` - Permanent records with snapshot prices
//!
//! # Migrations
//!
//! Migrations live in `crates/server/migrations/` and run on startup via
//! `sqlx::migrate!`.
//!
//! Queries use sqlx's runtime-checked API rather than the compile-time
//! macros so builds do not require a live database.

pub mod carts;
pub mod orders;
pub mod products;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use stitchline_core::{OrderStatus, VariantId};

pub use carts::CartRepository;
pub use orders::OrderRepository;
pub use products::ProductRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., duplicate SKU).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// Requested quantity exceeds available stock.
    #[error(
        "variant {variant_id} out of stock: requested {requested}, available {available}"
    )]
    OutOfStock {
        variant_id: VariantId,
        requested: i32,
        available: i32,
    },

    /// Illegal order status transition.
    #[error("illegal status transition: {from} -> {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

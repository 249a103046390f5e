//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! # Catalog
//! POST  /products                        - Create product
//! GET   /products                        - List products (category/featured filters)
//! GET   /products/search                 - Search by name/description substring
//! GET   /products/featured               - Featured listing
//! GET   /products/{id}                   - Product with variants
//! POST  /products/{id}/variants          - Create variant
//!
//! # Cart
//! GET    /users/{user_id}/cart           - Cart with resolved items
//! POST   /users/{user_id}/cart/items     - Add variant to cart
//! PATCH  /cart/items/{id}                - Change line quantity (0 deletes)
//! DELETE /cart/items/{id}                - Remove line (idempotent)
//!
//! # Orders
//! POST  /users/{user_id}/orders          - Create order from an item list
//! GET   /users/{user_id}/orders          - List the user's orders, newest first
//! GET   /users/{user_id}/orders/{id}     - Order with resolved items
//! PATCH /orders/{id}/status              - Apply a status transition
//! ```

pub mod cart;
pub mod orders;
pub mod products;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::state::AppState;

/// Build the application router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/products",
            post(products::create_product).get(products::list_products),
        )
        .route("/products/search", get(products::search_products))
        .route("/products/featured", get(products::featured_products))
        .route("/products/{id}", get(products::get_product))
        .route("/products/{id}/variants", post(products::create_variant))
        .route("/users/{user_id}/cart", get(cart::get_cart))
        .route("/users/{user_id}/cart/items", post(cart::add_to_cart))
        .route(
            "/cart/items/{id}",
            patch(cart::update_cart_item).delete(cart::remove_from_cart),
        )
        .route(
            "/users/{user_id}/orders",
            post(orders::create_order).get(orders::list_orders),
        )
        .route("/users/{user_id}/orders/{order_id}", get(orders::get_order))
        .route("/orders/{id}/status", patch(orders::update_order_status))
}

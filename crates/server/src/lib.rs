//! Stitchline Server - E-commerce HTTP API.
//!
//! # Architecture
//!
//! - Axum web framework with JSON request/response bodies
//! - `PostgreSQL` via sqlx for all persistence
//! - `validator`-checked inputs before business logic runs
//! - Repository types per aggregate: catalog, carts, orders
//!
//! The order repository is the only multi-row transactional component:
//! order creation locks variant rows, checks stock for every line, computes
//! the total from live prices, snapshots item prices, decrements stock and
//! clears the ordered cart lines as one unit.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;

//! Persistence, ingest pipeline and export for news sentiment and daily prices.
//!
//! Three tables (`stock_list`, `articles`, `daily_stock_price`) are stored through diesel,
//! on SQLite by default and on PostgreSQL with the `postgres` feature. Every write is an
//! idempotent upsert: replaying the same batch never creates duplicates.

#![deny(missing_docs)]

pub mod config;
pub mod db;
pub mod export;
pub mod models;
pub mod pipeline;
pub mod providers;
pub mod repo;
pub mod schema;
pub mod store;

pub use repo::{RepoError, RepoResult, StockRepo};
pub use store::Store;

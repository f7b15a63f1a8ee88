//! Small helpers shared by the ingestion and storage crates.

pub mod env;

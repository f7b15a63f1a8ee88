//! Alpaca market data v2 daily bars.

pub mod params;
pub mod provider;
pub mod response;

pub use params::{Adjustment, AlpacaBarsParams, Feed};
pub use provider::AlpacaProvider;

//! Canonical in-memory representation of a daily price bar (OHLCV).
//!
//! This struct is the standard output of every
//! [`PriceProvider`](crate::providers::PriceProvider) implementation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single daily OHLCV bar for one ticker.
///
/// The `(ticker, date)` pair is the natural key once persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBar {
    /// Trading day.
    pub date: NaiveDate,

    /// Opening price.
    pub open: f64,

    /// Highest price during the session.
    pub high: f64,

    /// Lowest price during the session.
    pub low: f64,

    /// Closing price.
    pub close: f64,

    /// Shares traded during the session.
    pub volume: i64,
}

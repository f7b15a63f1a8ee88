//! Provider abstraction for the two upstream sources of the pipeline.
//!
//! [`NewsProvider`] yields raw headline entries for a ticker and
//! [`PriceProvider`] yields daily OHLCV bars. Both are async and object safe so
//! the caller can pick a concrete source at runtime (`Box<dyn PriceProvider +
//! Send + Sync>`).
//!
//! # Example
//!
//! ```rust
//! use async_trait::async_trait;
//! use news_ingestor::models::news::RawNewsItem;
//! use news_ingestor::providers::{NewsProvider, ProviderError};
//!
//! struct Canned;
//!
//! #[async_trait]
//! impl NewsProvider for Canned {
//!     async fn fetch_news(&self, ticker: &str) -> Result<Vec<RawNewsItem>, ProviderError> {
//!         Ok(vec![RawNewsItem {
//!             title: format!("{ticker} beats estimates"),
//!             ticker: ticker.to_string(),
//!             publish_date: Some("Tue, 02 Jan 2024 14:30:00 GMT".into()),
//!             link: "https://example.com/1".into(),
//!         }])
//!     }
//! }
//! ```

pub mod alpaca_rest;
pub mod csv_file;
pub mod google_news;

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::NaiveDate;
use shared_utils::env::MissingEnvVarError;
use snafu::{Backtrace, Snafu};

use crate::models::{bar::DailyBar, news::RawNewsItem};

/// Source of headline entries for a ticker.
///
/// Result size and date range are whatever the upstream returns; no retries are
/// attempted here.
#[async_trait]
pub trait NewsProvider {
    /// Fetches the current feed entries for `ticker`.
    async fn fetch_news(&self, ticker: &str) -> Result<Vec<RawNewsItem>, ProviderError>;
}

/// Source of daily OHLCV bars for a ticker.
#[async_trait]
pub trait PriceProvider {
    /// Fetches daily bars for `ticker` with `start <= date <= end`, ascending by date.
    async fn fetch_daily_bars(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyBar>, ProviderError>;
}

/// Errors that can occur during the creation of a provider instance
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderInitError {
    /// missed environment variable.
    #[snafu(context(false), display("Missing environment variable: {source}"))]
    MissingEnvVar {
        source: MissingEnvVarError,
        backtrace: Backtrace,
    },

    /// failed to init reqwest client
    #[snafu(context(false), display("Failed to build HTTP client: {source}"))]
    ClientBuild {
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    /// API key contains invalid characters.
    #[snafu(context(false), display("Invalid API key format: {source}"))]
    InvalidApiKey {
        source: reqwest::header::InvalidHeaderValue,
        backtrace: Backtrace,
    },
}

/// Errors that can occur within a provider implementation.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderError {
    /// An error during an API request (e.g., network failure, timeout).
    #[snafu(context(false), display("API request failed: {source}"))]
    Reqwest {
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    /// The upstream answered with a non-success status.
    #[snafu(display("API error ({status}): {message}"))]
    Api {
        status: u16,
        message: String,
        backtrace: Backtrace,
    },

    /// The response body was not a readable syndication feed.
    #[snafu(display("Failed to parse feed from {url}: {source}"))]
    Feed {
        url: String,
        source: rss::Error,
        backtrace: Backtrace,
    },

    /// A local price file could not be read or decoded.
    #[snafu(display("Failed to read price file {}: {source}", path.display()))]
    PriceFile {
        path: PathBuf,
        source: csv::Error,
        backtrace: Backtrace,
    },

    /// The request parameters or returned values were invalid for this provider.
    #[snafu(display("Invalid parameters for provider: {message}"))]
    Validation {
        message: String,
        backtrace: Backtrace,
    },

    /// An error during provider configuration or initialization.
    #[snafu(context(false), display("Provider initialization error: {source}"))]
    Init {
        #[snafu(backtrace)]
        source: ProviderInitError,
    },
}

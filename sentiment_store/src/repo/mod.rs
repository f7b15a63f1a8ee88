//! Stock, article and price repository.
//!
//! [`StockRepo`] is implemented directly on the diesel connection types (see `sql.rs`),
//! so one body of queries serves SQLite and, with the `postgres` feature, PostgreSQL.
//! The trait is object safe; [`crate::db::connection::StoreConnection`] hands out a
//! `&mut dyn StockRepo` for whichever backend it opened.
//!
//! Every method runs in its own transaction. Writes resolve the ticker first and insert
//! row by row with `ON CONFLICT DO NOTHING` on the natural key, so replays are no-ops and
//! any other failure rolls the whole batch back.

mod sql;

use news_ingestor::models::{bar::DailyBar, news::ScoredArticle};

use crate::models::{ExportTables, PriceRecord, SentimentRecord};

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
/// Errors raised by the repository itself, as opposed to driver errors.
pub enum RepoError {
    #[error("ticker {symbol} is not registered in stock_list")]
    /// The ticker has no row in `stock_list`.
    TickerNotFound {
        /// The symbol that was looked up.
        symbol: String,
    },
    #[error("{backend} support was not compiled in (enable the `{backend}` feature)")]
    /// The configured backend is not part of this build.
    BackendUnavailable {
        /// Backend name, e.g. "postgres".
        backend: &'static str,
    },
}

/// Result type used throughout the repository for fallible operations.
pub type RepoResult<T> = anyhow::Result<T>;

/// Portable surface over one open connection.
pub trait StockRepo {
    /// Registers `symbol` if absent and returns its `stock_id`. Idempotent.
    fn ensure_stock(&mut self, symbol: &str) -> RepoResult<i32>;

    /// Returns the `stock_id` of `symbol` or [`RepoError::TickerNotFound`].
    fn resolve_stock(&mut self, symbol: &str) -> RepoResult<i32>;

    /// Inserts articles for `ticker`, skipping links already stored.
    ///
    /// Returns the number of rows actually inserted.
    fn upsert_articles(&mut self, ticker: &str, items: &[ScoredArticle]) -> RepoResult<usize>;

    /// Inserts daily bars for `ticker`, skipping `(date, ticker)` pairs already stored.
    ///
    /// Returns the number of rows actually inserted.
    fn upsert_price_bars(&mut self, ticker: &str, bars: &[DailyBar]) -> RepoResult<usize>;

    /// All registered symbols, ascending.
    fn list_tickers(&mut self) -> RepoResult<Vec<String>>;

    /// Stored bars for `ticker`, ascending by date.
    fn price_history(&mut self, ticker: &str) -> RepoResult<Vec<PriceRecord>>;

    /// Stored headlines for `ticker`, ascending by publish date.
    fn sentiment_history(&mut self, ticker: &str) -> RepoResult<Vec<SentimentRecord>>;

    /// Both tables joined with their symbol, ordered by symbol then date.
    fn export_all(&mut self) -> RepoResult<ExportTables>;
}

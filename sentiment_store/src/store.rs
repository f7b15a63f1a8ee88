//! Connection-per-call facade over [`StockRepo`].
//!
//! A [`Store`] owns only its [`StoreConfig`]. Each operation opens a connection, runs one
//! transaction through the repository and drops the connection before returning, so a
//! `Store` holds no open handles between calls.
//!
//! ```no_run
//! use sentiment_store::{Store, config::StoreConfig};
//!
//! let store = Store::new(StoreConfig::sqlite("sentiment.db"));
//! store.migrate()?;
//! let id = store.ensure_stock("ABC")?;
//! assert_eq!(store.resolve_stock("ABC")?, id);
//! # Ok::<(), anyhow::Error>(())
//! ```

use news_ingestor::models::{bar::DailyBar, news::ScoredArticle};

use crate::{
    config::StoreConfig,
    db::{connection::StoreConnection, migrate},
    models::{ExportTables, PriceRecord, SentimentRecord},
    repo::{RepoResult, StockRepo},
};

/// Persistence entry point.
#[derive(Debug)]
pub struct Store {
    config: StoreConfig,
}

impl Store {
    /// Store backed by `config`. No connection is opened here.
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    /// The connection target.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Applies pending schema migrations.
    pub fn migrate(&self) -> anyhow::Result<()> {
        migrate::run(&self.config)
    }

    fn with_repo<T>(&self, f: impl FnOnce(&mut dyn StockRepo) -> RepoResult<T>) -> RepoResult<T> {
        let mut conn = StoreConnection::open(&self.config)?;
        f(conn.repo())
    }

    /// See [`StockRepo::ensure_stock`].
    pub fn ensure_stock(&self, symbol: &str) -> RepoResult<i32> {
        self.with_repo(|repo| repo.ensure_stock(symbol))
    }

    /// See [`StockRepo::resolve_stock`].
    pub fn resolve_stock(&self, symbol: &str) -> RepoResult<i32> {
        self.with_repo(|repo| repo.resolve_stock(symbol))
    }

    /// See [`StockRepo::upsert_articles`].
    pub fn upsert_articles(&self, ticker: &str, items: &[ScoredArticle]) -> RepoResult<usize> {
        self.with_repo(|repo| repo.upsert_articles(ticker, items))
    }

    /// See [`StockRepo::upsert_price_bars`].
    pub fn upsert_price_bars(&self, ticker: &str, bars: &[DailyBar]) -> RepoResult<usize> {
        self.with_repo(|repo| repo.upsert_price_bars(ticker, bars))
    }

    /// See [`StockRepo::list_tickers`].
    pub fn list_tickers(&self) -> RepoResult<Vec<String>> {
        self.with_repo(|repo| repo.list_tickers())
    }

    /// See [`StockRepo::price_history`].
    pub fn get_price_history(&self, ticker: &str) -> RepoResult<Vec<PriceRecord>> {
        self.with_repo(|repo| repo.price_history(ticker))
    }

    /// See [`StockRepo::sentiment_history`].
    pub fn get_sentiment_history(&self, ticker: &str) -> RepoResult<Vec<SentimentRecord>> {
        self.with_repo(|repo| repo.sentiment_history(ticker))
    }

    /// See [`StockRepo::export_all`].
    pub fn export_all(&self) -> RepoResult<ExportTables> {
        self.with_repo(|repo| repo.export_all())
    }
}

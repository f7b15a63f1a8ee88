//! End-to-end ingest for one ticker.
//!
//! Stages run strictly in order: fetch headlines, strip markup, normalize (tokenize, stem,
//! parse dates), score, register the ticker, upsert articles, then fetch and upsert daily
//! bars. Any stage error aborts the run; writes already committed by earlier stages stay
//! committed and are harmless to replay.

use std::fmt;

use anyhow::Context;
use chrono::{Days, NaiveDate};
use news_ingestor::{
    models::news::RawNewsItem,
    providers::{NewsProvider, PriceProvider},
    text::{SentimentScorer, clean_html, preprocess},
};
use tracing::{debug, info};

use crate::store::Store;

/// Inclusive range of trading days to request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestWindow {
    /// First day, inclusive.
    pub start: NaiveDate,
    /// Last day, inclusive.
    pub end: NaiveDate,
}

impl IngestWindow {
    /// The `days` calendar days ending at `end`, both ends included.
    pub fn trailing(end: NaiveDate, days: u32) -> Self {
        let back = u64::from(days.saturating_sub(1));
        let start = end.checked_sub_days(Days::new(back)).unwrap_or(NaiveDate::MIN);
        Self { start, end }
    }
}

/// Counts from one [`ingest_ticker`] run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestReport {
    /// Ticker that was ingested.
    pub ticker: String,
    /// Headlines returned by the news provider.
    pub fetched_articles: usize,
    /// Headlines that were new to the store.
    pub inserted_articles: usize,
    /// Bars returned by the price provider (0 when prices are skipped).
    pub fetched_bars: usize,
    /// Bars that were new to the store.
    pub inserted_bars: usize,
}

impl fmt::Display for IngestReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: articles {}/{} new, bars {}/{} new",
            self.ticker,
            self.inserted_articles,
            self.fetched_articles,
            self.inserted_bars,
            self.fetched_bars
        )
    }
}

/// Runs the full pipeline for `ticker`.
///
/// `prices` may be `None` to ingest headlines only.
pub async fn ingest_ticker(
    store: &Store,
    news: &(dyn NewsProvider + Send + Sync),
    prices: Option<&(dyn PriceProvider + Send + Sync)>,
    scorer: &SentimentScorer,
    ticker: &str,
    window: IngestWindow,
) -> anyhow::Result<IngestReport> {
    let raw = news
        .fetch_news(ticker)
        .await
        .with_context(|| format!("fetching news for {ticker}"))?;
    let fetched_articles = raw.len();
    debug!(ticker, fetched_articles, "fetched headlines");

    let titles: Vec<&str> = raw.iter().map(|item| item.title.as_str()).collect();
    let cleaned: Vec<RawNewsItem> = raw
        .iter()
        .zip(clean_html(&titles))
        .map(|(item, title)| RawNewsItem {
            title,
            ..item.clone()
        })
        .collect();

    let normalized =
        preprocess(&cleaned).with_context(|| format!("normalizing headlines for {ticker}"))?;
    let scored = scorer.score_batch(normalized);

    store.ensure_stock(ticker)?;
    let inserted_articles = store.upsert_articles(ticker, &scored)?;

    let (fetched_bars, inserted_bars) = match prices {
        Some(provider) => {
            let bars = provider
                .fetch_daily_bars(ticker, window.start, window.end)
                .await
                .with_context(|| format!("fetching daily bars for {ticker}"))?;
            let inserted = store.upsert_price_bars(ticker, &bars)?;
            (bars.len(), inserted)
        }
        None => (0, 0),
    };

    let report = IngestReport {
        ticker: ticker.to_string(),
        fetched_articles,
        inserted_articles,
        fetched_bars,
        inserted_bars,
    };
    info!(
        ticker,
        fetched_articles,
        inserted_articles,
        fetched_bars,
        inserted_bars,
        "ingest complete"
    );
    Ok(report)
}

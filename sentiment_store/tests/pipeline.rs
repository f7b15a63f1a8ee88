mod common;

use async_trait::async_trait;
use chrono::NaiveDate;
use common::{bar, day, setup_store};
use news_ingestor::models::{bar::DailyBar, news::RawNewsItem};
use news_ingestor::providers::{NewsProvider, PriceProvider, ProviderError, ValidationSnafu};
use news_ingestor::text::{NormalizeError, SentimentScorer, stem_title};
use sentiment_store::pipeline::{IngestReport, IngestWindow, ingest_ticker};

struct CannedNews(Vec<RawNewsItem>);

#[async_trait]
impl NewsProvider for CannedNews {
    async fn fetch_news(&self, _ticker: &str) -> Result<Vec<RawNewsItem>, ProviderError> {
        Ok(self.0.clone())
    }
}

struct CannedBars(Vec<DailyBar>);

#[async_trait]
impl PriceProvider for CannedBars {
    async fn fetch_daily_bars(
        &self,
        _ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyBar>, ProviderError> {
        Ok(self
            .0
            .iter()
            .filter(|b| b.date >= start && b.date <= end)
            .cloned()
            .collect())
    }
}

struct Down;

#[async_trait]
impl NewsProvider for Down {
    async fn fetch_news(&self, _ticker: &str) -> Result<Vec<RawNewsItem>, ProviderError> {
        ValidationSnafu {
            message: "feed unavailable",
        }
        .fail()
    }
}

fn item(title: &str, date: &str, link: &str) -> RawNewsItem {
    RawNewsItem {
        title: title.into(),
        ticker: "ABC".into(),
        publish_date: Some(date.into()),
        link: link.into(),
    }
}

fn window() -> IngestWindow {
    IngestWindow {
        start: day(2024, 1, 1),
        end: day(2024, 1, 31),
    }
}

#[tokio::test]
async fn ingest_is_idempotent_end_to_end() {
    let (_db, store) = setup_store();
    let news = CannedNews(vec![
        item(
            "<b>ABC</b> shares surge on great earnings",
            "Tue, 02 Jan 2024 14:30:00 GMT",
            "https://x/1",
        ),
        item(
            "ABC faces terrible lawsuit",
            "Wed, 03 Jan 2024 09:00:00 EST",
            "https://x/2",
        ),
    ]);
    let prices = CannedBars(vec![
        bar(day(2024, 1, 2), 10.0, 12.0, 9.0, 11.0, 1000),
        bar(day(2024, 1, 3), 11.0, 11.5, 10.0, 10.5, 900),
        bar(day(2024, 2, 1), 1.0, 1.0, 1.0, 1.0, 1), // outside the window
    ]);
    let scorer = SentimentScorer::new();

    let first = ingest_ticker(&store, &news, Some(&prices), &scorer, "ABC", window())
        .await
        .unwrap();
    assert_eq!(
        first,
        IngestReport {
            ticker: "ABC".into(),
            fetched_articles: 2,
            inserted_articles: 2,
            fetched_bars: 2,
            inserted_bars: 2,
        }
    );

    let second = ingest_ticker(&store, &news, Some(&prices), &scorer, "ABC", window())
        .await
        .unwrap();
    assert_eq!(second.inserted_articles, 0);
    assert_eq!(second.inserted_bars, 0);

    let history = store.get_sentiment_history("ABC").unwrap();
    assert_eq!(history.len(), 2);
    // Markup stripped, lowercased and stemmed before storage.
    assert_eq!(history[0].title, stem_title("ABC shares surge on great earnings"));
    assert_eq!(history[0].publish_date, day(2024, 1, 2).and_hms_opt(14, 30, 0).unwrap());
    // EST is UTC-5.
    assert_eq!(history[1].publish_date, day(2024, 1, 3).and_hms_opt(14, 0, 0).unwrap());
    for row in &history {
        let s = row.compound_sentiment_score.unwrap();
        assert!((-1.0..=1.0).contains(&s));
    }
    assert_eq!(store.get_price_history("ABC").unwrap().len(), 2);
}

#[tokio::test]
async fn headlines_only_when_no_price_provider() {
    let (_db, store) = setup_store();
    let news = CannedNews(vec![item(
        "ABC steady",
        "Tue, 02 Jan 2024 14:30:00 GMT",
        "https://x/1",
    )]);

    let report = ingest_ticker(&store, &news, None, &SentimentScorer::new(), "ABC", window())
        .await
        .unwrap();
    assert_eq!(report.fetched_bars, 0);
    assert_eq!(report.inserted_articles, 1);
    assert!(store.get_price_history("ABC").unwrap().is_empty());
}

#[tokio::test]
async fn bad_date_fails_before_anything_is_written() {
    let (_db, store) = setup_store();
    let news = CannedNews(vec![
        item("fine", "Tue, 02 Jan 2024 14:30:00 GMT", "https://x/1"),
        item("broken", "2024-01-02T14:30:00Z", "https://x/2"),
    ]);

    let err = ingest_ticker(&store, &news, None, &SentimentScorer::new(), "ABC", window())
        .await
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<NormalizeError>(),
        Some(NormalizeError::InvalidDate { .. })
    ));
    assert!(store.list_tickers().unwrap().is_empty());
}

#[tokio::test]
async fn fetch_failure_propagates() {
    let (_db, store) = setup_store();

    let err = ingest_ticker(&store, &Down, None, &SentimentScorer::new(), "ABC", window())
        .await
        .unwrap_err();
    assert!(err.downcast_ref::<ProviderError>().is_some());
    assert!(format!("{err:#}").contains("feed unavailable"));
    assert!(store.list_tickers().unwrap().is_empty());
}

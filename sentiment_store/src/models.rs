//! Diesel models mapping to the database schema.
//!
//! These types mirror the tables defined in the embedded migrations and in
//! [`crate::schema`]:
//! - [`crate::schema::stock_list`] holds one row per ticker symbol
//! - [`crate::schema::articles`] holds scored headlines, unique by `link`
//! - [`crate::schema::daily_stock_price`] holds one OHLCV bar per `(date, stock_id)`
//!
//! Read-side projections (`PriceRecord`, `SentimentRecord`) and the joined export rows
//! live here as well so every query shape is declared next to the table it reads.

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use serde::Serialize;

use crate::schema::*;

/// A row in [`crate::schema::stock_list`].
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Identifiable, Selectable)]
#[diesel(table_name = stock_list, primary_key(stock_id), check_for_backend(diesel::sqlite::Sqlite))]
pub struct Stock {
    /// Surrogate key assigned by the database.
    pub stock_id: i32,
    /// Ticker symbol, unique across the table.
    pub symbol: String,
}

/// Insertable form of [`Stock`].
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = stock_list)]
pub struct NewStock<'a> {
    /// Ticker symbol.
    pub symbol: &'a str,
}

/// A row in [`crate::schema::articles`].
#[derive(Debug, Clone, PartialEq, Queryable, Identifiable, Selectable)]
#[diesel(table_name = articles, primary_key(article_id), check_for_backend(diesel::sqlite::Sqlite))]
pub struct Article {
    /// Surrogate key assigned by the database.
    pub article_id: i32,
    /// Canonical article URL; the deduplication key.
    pub link: String,
    /// Cleaned headline text.
    pub title: String,
    /// Publication instant in UTC.
    pub publish_date: NaiveDateTime,
    /// FK to [`Stock::stock_id`].
    pub stock_id: i32,
    /// Compound sentiment in [-1, 1]; NULL when the headline was never scored.
    pub compound_sentiment_score: Option<f64>,
}

/// Insertable form of [`Article`].
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = articles)]
pub struct NewArticle<'a> {
    /// Canonical article URL.
    pub link: &'a str,
    /// Cleaned headline text.
    pub title: &'a str,
    /// Publication instant in UTC.
    pub publish_date: NaiveDateTime,
    /// Owning stock.
    pub stock_id: i32,
    /// Compound sentiment, if scored.
    pub compound_sentiment_score: Option<f64>,
}

/// A row in [`crate::schema::daily_stock_price`].
#[derive(Debug, Clone, PartialEq, Queryable, Identifiable, Selectable)]
#[diesel(table_name = daily_stock_price, primary_key(dsp_id), check_for_backend(diesel::sqlite::Sqlite))]
pub struct DailyStockPrice {
    /// Surrogate key assigned by the database.
    pub dsp_id: i32,
    /// FK to [`Stock::stock_id`].
    pub stock_id: i32,
    /// Opening price.
    pub open: f64,
    /// Session high.
    pub high: f64,
    /// Session low.
    pub low: f64,
    /// Closing price.
    pub close: f64,
    /// Shares traded.
    pub volume: i64,
    /// Trading day.
    pub date: NaiveDate,
}

/// Insertable form of [`DailyStockPrice`].
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = daily_stock_price)]
pub struct NewDailyStockPrice {
    /// Owning stock.
    pub stock_id: i32,
    /// Opening price.
    pub open: f64,
    /// Session high.
    pub high: f64,
    /// Session low.
    pub low: f64,
    /// Closing price.
    pub close: f64,
    /// Shares traded.
    pub volume: i64,
    /// Trading day.
    pub date: NaiveDate,
}

/// One bar of a ticker's price history, without keys.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Serialize)]
#[diesel(table_name = daily_stock_price, check_for_backend(diesel::sqlite::Sqlite))]
pub struct PriceRecord {
    /// Trading day.
    pub date: NaiveDate,
    /// Opening price.
    pub open: f64,
    /// Session high.
    pub high: f64,
    /// Session low.
    pub low: f64,
    /// Closing price.
    pub close: f64,
    /// Shares traded.
    pub volume: i64,
}

/// One scored headline of a ticker's sentiment history.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Serialize)]
#[diesel(table_name = articles, check_for_backend(diesel::sqlite::Sqlite))]
pub struct SentimentRecord {
    /// Publication instant in UTC.
    pub publish_date: NaiveDateTime,
    /// Headline text.
    pub title: String,
    /// Article URL.
    pub link: String,
    /// Compound sentiment, if scored.
    pub compound_sentiment_score: Option<f64>,
}

/// Joined `daily_stock_price` x `stock_list` row written to `prices.csv`.
///
/// Field order matches the select tuple in the export query and the CSV header.
#[derive(Debug, Clone, PartialEq, Queryable, Serialize)]
pub struct PriceExportRow {
    /// Ticker symbol.
    pub symbol: String,
    /// Trading day.
    pub date: NaiveDate,
    /// Opening price.
    pub open: f64,
    /// Session high.
    pub high: f64,
    /// Session low.
    pub low: f64,
    /// Closing price.
    pub close: f64,
    /// Shares traded.
    pub volume: i64,
}

impl PriceExportRow {
    /// CSV header for this row shape.
    pub const HEADERS: [&'static str; 7] =
        ["symbol", "date", "open", "high", "low", "close", "volume"];
}

/// Joined `articles` x `stock_list` row written to `articles.csv`.
#[derive(Debug, Clone, PartialEq, Queryable, Serialize)]
pub struct ArticleExportRow {
    /// Ticker symbol.
    pub symbol: String,
    /// Article URL.
    pub link: String,
    /// Headline text.
    pub title: String,
    /// Publication instant in UTC.
    pub publish_date: NaiveDateTime,
    /// Compound sentiment, if scored.
    pub compound_sentiment_score: Option<f64>,
}

impl ArticleExportRow {
    /// CSV header for this row shape.
    pub const HEADERS: [&'static str; 5] =
        ["symbol", "link", "title", "publish_date", "compound_sentiment_score"];
}

/// Both export tables, each ordered by symbol then date.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportTables {
    /// Every stored price bar.
    pub prices: Vec<PriceExportRow>,
    /// Every stored article.
    pub articles: Vec<ArticleExportRow>,
}

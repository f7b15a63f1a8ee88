//! Headline records at each stage of the text pipeline.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One entry as it came out of the news feed, untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawNewsItem {
    /// Headline, possibly containing markup.
    pub title: String,
    /// Ticker the feed was queried for.
    pub ticker: String,
    /// Publication date string exactly as the feed reported it, if any.
    pub publish_date: Option<String>,
    /// Source link; the article's natural key.
    pub link: String,
}

/// A headline after tokenize/stem and date parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedItem {
    /// Stemmed tokens joined by single spaces.
    pub title: String,
    pub ticker: String,
    /// Publication instant in UTC.
    pub publish_date: NaiveDateTime,
    pub link: String,
}

/// A normalized headline carrying its compound sentiment score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredArticle {
    pub title: String,
    pub ticker: String,
    pub publish_date: NaiveDateTime,
    pub link: String,
    /// VADER compound score in `[-1, 1]`; `None` until scored.
    pub compound_sentiment_score: Option<f64>,
}

impl ScoredArticle {
    /// Wraps a normalized item that has not been scored yet.
    pub fn unscored(item: NormalizedItem) -> Self {
        Self {
            title: item.title,
            ticker: item.ticker,
            publish_date: item.publish_date,
            link: item.link,
            compound_sentiment_score: None,
        }
    }
}

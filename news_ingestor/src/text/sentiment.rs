//! Compound polarity scoring with VADER.
//!
//! Scores are deterministic and lie in `[-1, 1]`. The conventional reading is
//! captured by [`SentimentLabel::classify`]; labels are for reporting only and
//! are never persisted.

use std::fmt;

use vader_sentiment::SentimentIntensityAnalyzer;

use crate::models::news::{NormalizedItem, ScoredArticle};

/// Lower bound of the positive band.
pub const POSITIVE_THRESHOLD: f64 = 0.05;
/// Upper bound of the negative band.
pub const NEGATIVE_THRESHOLD: f64 = -0.05;

/// Three-way reading of a compound score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    /// `>= 0.05` positive, `<= -0.05` negative, otherwise neutral.
    pub fn classify(score: f64) -> Self {
        if score >= POSITIVE_THRESHOLD {
            SentimentLabel::Positive
        } else if score <= NEGATIVE_THRESHOLD {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Neutral => "neutral",
            SentimentLabel::Negative => "negative",
        })
    }
}

/// Lexicon/rule based scorer. Build once and reuse; construction loads the lexicon.
pub struct SentimentScorer {
    analyzer: SentimentIntensityAnalyzer<'static>,
}

impl SentimentScorer {
    pub fn new() -> Self {
        Self {
            analyzer: SentimentIntensityAnalyzer::new(),
        }
    }

    /// Compound score of `text` in `[-1, 1]`. Blank text scores `0.0`.
    pub fn score(&self, text: &str) -> f64 {
        if text.trim().is_empty() {
            return 0.0;
        }
        let scores = self.analyzer.polarity_scores(text);
        scores
            .get("compound")
            .copied()
            .unwrap_or(0.0)
            .clamp(-1.0, 1.0)
    }

    /// Scores each normalized title, preserving order.
    pub fn score_batch(&self, items: Vec<NormalizedItem>) -> Vec<ScoredArticle> {
        items
            .into_iter()
            .map(|item| {
                let score = self.score(&item.title);
                ScoredArticle {
                    compound_sentiment_score: Some(score),
                    ..ScoredArticle::unscored(item)
                }
            })
            .collect()
    }
}

impl Default for SentimentScorer {
    fn default() -> Self {
        Self::new()
    }
}

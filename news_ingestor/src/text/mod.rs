//! Headline text processing: markup removal, tokenize/stem, feed date parsing
//! and sentiment scoring.
//!
//! The stages are applied in this order by the ingest pipeline:
//! [`html::clean_html`] → [`normalize::preprocess`] → [`sentiment::SentimentScorer`].
//! Scoring runs on the *stemmed* title; changing that order changes the scores.

pub mod date;
pub mod html;
pub mod normalize;
pub mod sentiment;

pub use date::parse_publish_date;
pub use html::{clean_html, strip_markup};
pub use normalize::{NormalizeError, preprocess, stem_title, tokenize};
pub use sentiment::{SentimentLabel, SentimentScorer};

//! Upstream half of the sentiment pipeline: fetch headlines and daily bars for a
//! ticker, normalize headline text, and score it.
//!
//! - [`providers`]: the [`NewsProvider`](providers::NewsProvider) and
//!   [`PriceProvider`](providers::PriceProvider) traits plus concrete sources
//!   (Google News RSS, Alpaca daily bars, CSV files).
//! - [`text`]: HTML cleaning, tokenize/stem, feed date parsing, VADER scoring.
//! - [`models`]: vendor-agnostic records passed between the stages.

pub mod models;
pub mod providers;
pub mod text;

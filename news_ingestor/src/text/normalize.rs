//! Tokenize, stem, and date-parse cleaned headlines.

use once_cell::sync::Lazy;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use thiserror::Error;

use crate::{
    models::news::{NormalizedItem, RawNewsItem},
    text::date::parse_publish_date,
};

/// Failures that reject a whole batch during normalization.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NormalizeError {
    /// The feed date does not follow `%a, %d %b %Y %H:%M:%S %Z`.
    #[error("unexpected publish date {raw:?}: {reason}")]
    InvalidDate { raw: String, reason: String },

    /// The feed entry carried no publish date at all.
    #[error("feed entry {link} has no publish date")]
    MissingDate { link: String },
}

static TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\p{L}\p{N}]+(?:['’.\-&][\p{L}\p{N}]+)*|[^\s\p{L}\p{N}]").expect("token regex")
});

const CLITICS: [&str; 6] = ["'s", "'re", "'ve", "'ll", "'d", "'m"];

/// Splits English clitics off a word token: `don't` → `do` `n't`, `Apple's` → `Apple` `'s`.
fn split_clitic(word: &str) -> (String, Option<String>) {
    let word = word.replace('’', "'");
    let lower = word.to_lowercase();
    if word.len() > 3 && lower.ends_with("n't") && word.is_char_boundary(word.len() - 3) {
        let cut = word.len() - 3;
        return (word[..cut].to_string(), Some(word[cut..].to_string()));
    }
    for clitic in CLITICS {
        if word.len() > clitic.len()
            && lower.ends_with(clitic)
            && word.is_char_boundary(word.len() - clitic.len())
        {
            let cut = word.len() - clitic.len();
            return (word[..cut].to_string(), Some(word[cut..].to_string()));
        }
    }
    (word, None)
}

/// Splits a title into word and punctuation tokens.
///
/// Words keep inner apostrophes, dots, hyphens and ampersands (`AT&T`, `3.5`,
/// `e-commerce`); every other non-space symbol is its own token.
pub fn tokenize(title: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    for m in TOKEN_RE.find_iter(title) {
        let (head, clitic) = split_clitic(m.as_str());
        tokens.push(head);
        tokens.extend(clitic);
    }
    tokens
}

fn stem_with(stemmer: &Stemmer, title: &str) -> String {
    tokenize(title)
        .iter()
        .map(|t| stemmer.stem(&t.to_lowercase()).into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lowercases and stems every token of `title`, joined by single spaces.
pub fn stem_title(title: &str) -> String {
    stem_with(&Stemmer::create(Algorithm::English), title)
}

/// Normalizes a batch of (already markup-free) items.
///
/// Fails on the first entry with a missing or malformed publish date; no
/// partial batch is returned.
pub fn preprocess(items: &[RawNewsItem]) -> Result<Vec<NormalizedItem>, NormalizeError> {
    let stemmer = Stemmer::create(Algorithm::English);
    items
        .iter()
        .map(|item| {
            let raw_date = item
                .publish_date
                .as_deref()
                .ok_or_else(|| NormalizeError::MissingDate {
                    link: item.link.clone(),
                })?;
            Ok(NormalizedItem {
                title: stem_with(&stemmer, &item.title),
                ticker: item.ticker.clone(),
                publish_date: parse_publish_date(raw_date)?,
                link: item.link.clone(),
            })
        })
        .collect()
}

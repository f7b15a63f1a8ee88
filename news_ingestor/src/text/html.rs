//! Markup removal for feed titles.
//!
//! A `<` only opens a tag when followed by a letter, `/`, `!` or `?` and closed
//! by a later `>`; anything else is kept as text. Character references are
//! decoded (`&amp;`, `&#39;`, `&#x2019;`), unknown named ones are left as-is.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<(?:[A-Za-z/?]|!)[^<>]*>").expect("tag regex"));
static ENTITY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&(?:#([0-9]{1,7})|#[xX]([0-9a-fA-F]{1,6})|([A-Za-z][A-Za-z0-9]{1,31}));")
        .expect("entity regex")
});

fn named_entity(name: &str) -> Option<char> {
    let c = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        "ndash" => '\u{2013}',
        "mdash" => '\u{2014}',
        "lsquo" => '\u{2018}',
        "rsquo" => '\u{2019}',
        "ldquo" => '\u{201c}',
        "rdquo" => '\u{201d}',
        "hellip" => '\u{2026}',
        "euro" => '\u{20ac}',
        "pound" => '\u{a3}',
        "copy" => '\u{a9}',
        "reg" => '\u{ae}',
        "trade" => '\u{2122}',
        _ => return None,
    };
    Some(c)
}

fn decode_entity(caps: &Captures<'_>) -> String {
    let decoded = if let Some(dec) = caps.get(1) {
        dec.as_str().parse::<u32>().ok().and_then(char::from_u32)
    } else if let Some(hex) = caps.get(2) {
        u32::from_str_radix(hex.as_str(), 16)
            .ok()
            .and_then(char::from_u32)
    } else {
        caps.get(3).and_then(|n| named_entity(n.as_str()))
    };
    match decoded {
        Some(c) => c.to_string(),
        None => caps[0].to_string(),
    }
}

/// Removes markup from one title and decodes character references.
pub fn strip_markup(title: &str) -> String {
    let without_tags = TAG_RE.replace_all(title, "");
    ENTITY_RE
        .replace_all(&without_tags, |caps: &Captures<'_>| decode_entity(caps))
        .into_owned()
}

/// Removes markup from a batch of titles, preserving order.
pub fn clean_html<S: AsRef<str>>(titles: &[S]) -> Vec<String> {
    titles.iter().map(|t| strip_markup(t.as_ref())).collect()
}

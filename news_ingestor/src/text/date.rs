//! Feed publication dates.
//!
//! Accepted shape: `<weekday>, <day> <month> <year> <hh>:<mm>:<ss> <zone-name>`,
//! e.g. `Tue, 02 Jan 2024 14:30:00 GMT`. The zone must be a *name*:
//! `GMT`, `UTC`, `UT` and `Z` are UTC, anything else is looked up in the IANA
//! database (`EST`, `Europe/London`, ...). Numeric offsets (`+0000`) are
//! rejected. Results are naive UTC timestamps.
//!
//! A local time that occurs twice (DST fall-back) resolves to the earlier
//! instant; one that never occurs (spring-forward gap) is an error.

use chrono::{NaiveDateTime, TimeZone, offset::LocalResult};
use chrono_tz::Tz;

use crate::text::normalize::NormalizeError;

/// Everything before the zone name, in `chrono` notation.
pub const FEED_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S";

fn invalid(raw: &str, reason: impl Into<String>) -> NormalizeError {
    NormalizeError::InvalidDate {
        raw: raw.to_string(),
        reason: reason.into(),
    }
}

fn local_to_utc(naive: NaiveDateTime, tz: Tz) -> Option<NaiveDateTime> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Some(dt.naive_utc()),
        LocalResult::Ambiguous(earliest, _) => Some(earliest.naive_utc()),
        LocalResult::None => None,
    }
}

/// Parses one feed date into a naive UTC timestamp.
pub fn parse_publish_date(raw: &str) -> Result<NaiveDateTime, NormalizeError> {
    let trimmed = raw.trim();
    let (stamp, zone) = trimmed
        .rsplit_once(' ')
        .ok_or_else(|| invalid(raw, "missing timezone name"))?;

    let naive = NaiveDateTime::parse_from_str(stamp.trim_end(), FEED_DATE_FORMAT)
        .map_err(|e| invalid(raw, e.to_string()))?;

    match zone {
        "GMT" | "UTC" | "UT" | "Z" => Ok(naive),
        name => {
            let tz: Tz = name
                .parse()
                .map_err(|_| invalid(raw, format!("unknown timezone name {name:?}")))?;
            local_to_utc(naive, tz)
                .ok_or_else(|| invalid(raw, format!("nonexistent local time in {name}")))
        }
    }
}

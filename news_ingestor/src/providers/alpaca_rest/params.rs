use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Specifies the corporate action adjustment for stock data.
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Adjustment {
    #[default]
    Raw,
    Split,
    Dividend,
    All,
}

impl Adjustment {
    fn as_str(&self) -> &'static str {
        match self {
            Adjustment::Raw => "raw",
            Adjustment::Split => "split",
            Adjustment::Dividend => "dividend",
            Adjustment::All => "all",
        }
    }
}

/// Specifies the source feed for stock data.
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Feed {
    Sip,
    #[default]
    Iex,
    Otc,
}

impl Feed {
    fn as_str(&self) -> &'static str {
        match self {
            Feed::Sip => "sip",
            Feed::Iex => "iex",
            Feed::Otc => "otc",
        }
    }
}

/// Alpaca-specific knobs for a daily bars request.
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct AlpacaBarsParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adjustment: Option<Adjustment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feed: Option<Feed>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

/// Builds the query string for one page of a single-symbol daily request.
///
/// `end` is inclusive for callers; Alpaca treats it as the last day requested.
pub fn construct_params(
    ticker: &str,
    start: NaiveDate,
    end: NaiveDate,
    extra: &AlpacaBarsParams,
) -> Vec<(String, String)> {
    let mut q = vec![
        ("symbols".to_string(), ticker.to_string()),
        ("timeframe".to_string(), "1Day".to_string()),
        ("start".to_string(), start.format("%Y-%m-%d").to_string()),
        ("end".to_string(), end.format("%Y-%m-%d").to_string()),
        ("sort".to_string(), "asc".to_string()),
    ];
    if let Some(adj) = &extra.adjustment {
        q.push(("adjustment".to_string(), adj.as_str().to_string()));
    }
    if let Some(feed) = &extra.feed {
        q.push(("feed".to_string(), feed.as_str().to_string()));
    }
    if let Some(limit) = extra.limit {
        q.push(("limit".to_string(), limit.to_string()));
    }
    q
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn daily_query_includes_optional_knobs() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let extra = AlpacaBarsParams {
            adjustment: Some(Adjustment::Split),
            feed: None,
            limit: Some(500),
        };

        let q = construct_params("AAPL", start, end, &extra);

        assert!(q.contains(&("timeframe".into(), "1Day".into())));
        assert!(q.contains(&("start".into(), "2024-01-02".into())));
        assert!(q.contains(&("adjustment".into(), "split".into())));
        assert!(q.contains(&("limit".into(), "500".into())));
        assert!(!q.iter().any(|(k, _)| k == "feed"));
    }
}

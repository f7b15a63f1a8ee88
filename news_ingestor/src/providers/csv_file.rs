//! Daily bars from local CSV files, one file per ticker.
//!
//! Layout: `<dir>/<TICKER>.csv` with the header `Date,Open,High,Low,Close,Volume`
//! (the shape most download tools emit). `Date` may be a plain `YYYY-MM-DD` or
//! a timestamp that starts with one (`2024-01-02 00:00:00-05:00`); only the
//! calendar day is kept. Extra columns are ignored.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use snafu::ResultExt;
use tracing::debug;

use crate::{
    models::bar::DailyBar,
    providers::{PriceFileSnafu, PriceProvider, ProviderError, ValidationSnafu},
};

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Open")]
    open: f64,
    #[serde(rename = "High")]
    high: f64,
    #[serde(rename = "Low")]
    low: f64,
    #[serde(rename = "Close")]
    close: f64,
    #[serde(rename = "Volume")]
    volume: f64,
}

/// Reads `<dir>/<TICKER>.csv` files.
#[derive(Debug, Clone)]
pub struct CsvPriceProvider {
    dir: PathBuf,
}

impl CsvPriceProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the file holding `ticker`'s bars.
    pub fn path_for(&self, ticker: &str) -> PathBuf {
        self.dir.join(format!("{ticker}.csv"))
    }
}

fn parse_day(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let head = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}

fn parse_volume(v: f64) -> Option<i64> {
    (v.is_finite() && v.fract() == 0.0 && v >= 0.0 && v < i64::MAX as f64).then_some(v as i64)
}

/// Reads every bar in `path`, rejecting rows whose date or volume does not parse.
pub fn read_bars(path: &Path) -> Result<Vec<DailyBar>, ProviderError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .context(PriceFileSnafu { path })?;

    let mut bars = Vec::new();
    for row in reader.deserialize::<CsvRow>() {
        let row = row.context(PriceFileSnafu { path })?;
        let Some(date) = parse_day(&row.date) else {
            return ValidationSnafu {
                message: format!("bad Date {:?} in {}", row.date, path.display()),
            }
            .fail();
        };
        let Some(volume) = parse_volume(row.volume) else {
            return ValidationSnafu {
                message: format!("bad Volume {} on {date} in {}", row.volume, path.display()),
            }
            .fail();
        };
        bars.push(DailyBar {
            date,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            volume,
        });
    }
    bars.sort_by_key(|b| b.date);
    Ok(bars)
}

#[async_trait]
impl PriceProvider for CsvPriceProvider {
    async fn fetch_daily_bars(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyBar>, ProviderError> {
        let path = self.path_for(ticker);
        let bars: Vec<DailyBar> = read_bars(&path)?
            .into_iter()
            .filter(|b| b.date >= start && b.date <= end)
            .collect();
        debug!(ticker, path = %path.display(), count = bars.len(), "read csv daily bars");
        Ok(bars)
    }
}

//! Provider registry: maps configured sources to concrete providers.
use news_ingestor::providers::{
    PriceProvider, ProviderInitError, alpaca_rest::AlpacaProvider, csv_file::CsvPriceProvider,
    google_news::GoogleNewsProvider,
};

use crate::config::{NewsCfg, PricesCfg};

/// Where daily bars come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PriceSource {
    /// Skip price ingestion.
    None,
    /// `<dir>/<TICKER>.csv` files.
    CsvDir(std::path::PathBuf),
    /// Alpaca market data API, credentials from the environment.
    Alpaca,
}

impl PriceSource {
    /// Source named by a `[prices]` section.
    pub fn from_cfg(cfg: &PricesCfg) -> Self {
        match (&cfg.csv_dir, cfg.alpaca) {
            (_, true) => PriceSource::Alpaca,
            (Some(dir), false) => PriceSource::CsvDir(dir.clone()),
            (None, false) => PriceSource::None,
        }
    }
}

/// Build the headline provider for a `[news]` section.
pub fn build_news_provider(cfg: &NewsCfg) -> Result<GoogleNewsProvider, ProviderInitError> {
    GoogleNewsProvider::with_base_url(cfg.base_url.clone())
}

/// Build and return a boxed price provider for the supplied source, `None` when prices
/// are skipped.
pub fn build_price_provider(
    source: &PriceSource,
) -> Result<Option<Box<dyn PriceProvider + Send + Sync>>, ProviderInitError> {
    match source {
        PriceSource::None => Ok(None),
        PriceSource::CsvDir(dir) => Ok(Some(Box::new(CsvPriceProvider::new(dir.clone())))),
        PriceSource::Alpaca => {
            let p = AlpacaProvider::new()?;
            Ok(Some(Box::new(p)))
        }
    }
}

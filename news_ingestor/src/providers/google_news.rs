//! Google News RSS search feed.
//!
//! One GET per ticker against `{base}/rss/search?q=<TICKER>+stock&hl=en-US&gl=US&ceid=US:en`.
//! The provider decides how many entries come back and how far back they go.

use async_trait::async_trait;
use reqwest::Client;
use snafu::ResultExt;
use tracing::{debug, warn};

use crate::{
    models::news::RawNewsItem,
    providers::{ApiSnafu, FeedSnafu, NewsProvider, ProviderError, ProviderInitError},
};

/// Public Google News endpoint.
pub const BASE_URL: &str = "https://news.google.com";

const USER_AGENT: &str = concat!("news_ingestor/", env!("CARGO_PKG_VERSION"));

/// Fetches headline entries from the Google News search feed.
pub struct GoogleNewsProvider {
    client: Client,
    base_url: String,
}

impl GoogleNewsProvider {
    /// Creates a provider pointed at the public endpoint.
    pub fn new() -> Result<Self, ProviderInitError> {
        Self::with_base_url(BASE_URL)
    }

    /// Creates a provider pointed at another host (a mirror or a local mock server).
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, ProviderInitError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn search_url(&self) -> String {
        format!("{}/rss/search", self.base_url)
    }
}

/// Query string for a ticker search; reqwest encodes the space as `+`.
fn search_params(ticker: &str) -> [(&'static str, String); 4] {
    [
        ("q", format!("{ticker} stock")),
        ("hl", "en-US".to_string()),
        ("gl", "US".to_string()),
        ("ceid", "US:en".to_string()),
    ]
}

/// Converts a parsed channel into raw items, skipping entries without a title or link.
pub fn items_from_channel(channel: &rss::Channel, ticker: &str) -> Vec<RawNewsItem> {
    channel
        .items()
        .iter()
        .filter_map(|item| {
            let (Some(title), Some(link)) = (item.title(), item.link()) else {
                warn!(ticker, "skipping feed entry without title or link");
                return None;
            };
            Some(RawNewsItem {
                title: title.to_string(),
                ticker: ticker.to_string(),
                publish_date: item.pub_date().map(str::to_string),
                link: link.to_string(),
            })
        })
        .collect()
}

#[async_trait]
impl NewsProvider for GoogleNewsProvider {
    async fn fetch_news(&self, ticker: &str) -> Result<Vec<RawNewsItem>, ProviderError> {
        let url = self.search_url();
        let response = self
            .client
            .get(&url)
            .query(&search_params(ticker))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown API error".to_string());
            return ApiSnafu {
                status: status.as_u16(),
                message,
            }
            .fail();
        }

        let body = response.bytes().await?;
        let channel = rss::Channel::read_from(&body[..]).context(FeedSnafu { url })?;
        let items = items_from_channel(&channel, ticker);
        debug!(ticker, count = items.len(), "fetched news feed");

        Ok(items)
    }
}

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, header};
use secrecy::{ExposeSecret, SecretString};
use shared_utils::env::get_env_var;
use tracing::debug;

use crate::{
    models::bar::DailyBar,
    providers::{
        ApiSnafu, PriceProvider, ProviderError, ProviderInitError, ValidationSnafu,
        alpaca_rest::{
            params::{AlpacaBarsParams, construct_params},
            response::{AlpacaBar, AlpacaResponse},
        },
    },
};

/// Alpaca market data host.
pub const BASE_URL: &str = "https://data.alpaca.markets";

pub struct AlpacaProvider {
    client: Client,
    base_url: String,
    params: AlpacaBarsParams,
}

impl AlpacaProvider {
    /// Creates a new Alpaca provider.
    ///
    /// Reads API keys from the `APCA_API_KEY_ID` and `APCA_API_SECRET_KEY`
    /// environment variables.
    pub fn new() -> Result<Self, ProviderInitError> {
        let api_key = SecretString::new(get_env_var("APCA_API_KEY_ID")?.into());
        let secret_key = SecretString::new(get_env_var("APCA_API_SECRET_KEY")?.into());
        Self::with_credentials(api_key, secret_key, BASE_URL)
    }

    /// Creates a provider with explicit keys and host.
    ///
    /// The keys only live in the client's default headers.
    pub fn with_credentials(
        api_key: SecretString,
        secret_key: SecretString,
        base_url: &str,
    ) -> Result<Self, ProviderInitError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            "APCA-API-KEY-ID",
            header::HeaderValue::from_str(api_key.expose_secret())?,
        );
        headers.insert(
            "APCA-API-SECRET-KEY",
            header::HeaderValue::from_str(secret_key.expose_secret())?,
        );

        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            params: AlpacaBarsParams::default(),
        })
    }

    /// Overrides the adjustment/feed/page-size knobs sent with each request.
    pub fn with_params(mut self, params: AlpacaBarsParams) -> Self {
        self.params = params;
        self
    }
}

fn to_daily_bar(ab: AlpacaBar) -> Result<DailyBar, ProviderError> {
    let volume = i64::try_from(ab.volume).map_err(|_| {
        ValidationSnafu {
            message: format!("volume {} out of range", ab.volume),
        }
        .build()
    })?;
    Ok(DailyBar {
        date: ab.timestamp.date_naive(),
        open: ab.open,
        high: ab.high,
        low: ab.low,
        close: ab.close,
        volume,
    })
}

#[async_trait]
impl PriceProvider for AlpacaProvider {
    async fn fetch_daily_bars(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyBar>, ProviderError> {
        if end < start {
            return ValidationSnafu {
                message: format!("end {end} is before start {start}"),
            }
            .fail();
        }

        let url = format!("{}/v2/stocks/bars", self.base_url);
        let mut collected: Vec<AlpacaBar> = Vec::new();
        let mut next_page_token: Option<String> = None;

        loop {
            let mut query_params = construct_params(ticker, start, end, &self.params);
            if let Some(token) = &next_page_token {
                query_params.push(("page_token".to_string(), token.clone()));
            }

            let response = self.client.get(&url).query(&query_params).send().await?;

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

            let page = response.json::<AlpacaResponse>().await?;

            // Single-symbol request: anything keyed under another symbol is ignored.
            if let Some(mut bars) = page.bars {
                if let Some(ours) = bars.swap_remove(ticker) {
                    collected.extend(ours);
                }
            }

            match page.next_page_token {
                Some(token) if next_page_token.as_deref() == Some(token.as_str()) => {
                    return ValidationSnafu {
                        message: format!("page token {token} repeated for {ticker}"),
                    }
                    .fail();
                }
                Some(token) => next_page_token = Some(token),
                None => break,
            }
        }

        debug!(ticker, count = collected.len(), "fetched alpaca daily bars");
        collected.into_iter().map(to_daily_bar).collect()
    }
}

#[cfg(test)]
mod tests {
    use httpmock::{Method::GET, MockServer};

    use super::*;

    fn provider(server: &MockServer) -> AlpacaProvider {
        AlpacaProvider::with_credentials(
            SecretString::new("key".into()),
            SecretString::new("secret".into()),
            &server.base_url(),
        )
        .unwrap()
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[tokio::test]
    async fn maps_single_page_of_bars() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/v2/stocks/bars")
                .query_param("symbols", "ABC")
                .query_param("timeframe", "1Day")
                .query_param("start", "2024-01-02")
                .query_param("end", "2024-01-03")
                .header("APCA-API-KEY-ID", "key");
            then.status(200)
                .header("content-type", "application/json")
                .body(
                    r#"{"bars":{"ABC":[{"t":"2024-01-02T05:00:00Z","o":10.0,"h":12.0,"l":9.0,"c":11.0,"v":1000,"n":5,"vw":10.5},{"t":"2024-01-03T05:00:00Z","o":11.0,"h":13.0,"l":10.5,"c":12.5,"v":2000}]},"next_page_token":null}"#,
                );
        });

        let bars = provider(&server)
            .fetch_daily_bars("ABC", day(2), day(3))
            .await
            .unwrap();

        mock.assert();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].date, day(2));
        assert_eq!(bars[0].volume, 1000);
        assert_eq!(bars[1].close, 12.5);
    }

    #[tokio::test]
    async fn follows_page_tokens_until_exhausted() {
        let server = MockServer::start();
        let second = server.mock(|when, then| {
            when.method(GET)
                .path("/v2/stocks/bars")
                .query_param("page_token", "tok");
            then.status(200)
                .header("content-type", "application/json")
                .body(
                    r#"{"bars":{"ABC":[{"t":"2024-01-03T05:00:00Z","o":11.0,"h":13.0,"l":10.5,"c":12.5,"v":2000}]},"next_page_token":null}"#,
                );
        });
        let first = server.mock(|when, then| {
            when.method(GET)
                .path("/v2/stocks/bars")
                .query_param_missing("page_token");
            then.status(200)
                .header("content-type", "application/json")
                .body(
                    r#"{"bars":{"ABC":[{"t":"2024-01-02T05:00:00Z","o":10.0,"h":12.0,"l":9.0,"c":11.0,"v":1000}]},"next_page_token":"tok"}"#,
                );
        });

        let bars = provider(&server)
            .fetch_daily_bars("ABC", day(2), day(3))
            .await
            .unwrap();

        first.assert();
        second.assert();
        assert_eq!(
            bars.iter().map(|b| b.date).collect::<Vec<_>>(),
            vec![day(2), day(3)]
        );
        assert_eq!(bars[1].volume, 2000);
    }

    #[tokio::test]
    async fn repeated_page_token_is_rejected() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v2/stocks/bars");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"bars":null,"next_page_token":"stuck"}"#);
        });

        let err = provider(&server)
            .fetch_daily_bars("ABC", day(2), day(3))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Validation { .. }), "{err}");
    }

    #[tokio::test]
    async fn empty_window_yields_no_bars() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v2/stocks/bars");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"bars":null,"next_page_token":null}"#);
        });

        let bars = provider(&server)
            .fetch_daily_bars("ABC", day(6), day(7))
            .await
            .unwrap();
        assert!(bars.is_empty());
    }

    #[tokio::test]
    async fn non_success_status_is_an_api_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v2/stocks/bars");
            then.status(403).body("forbidden");
        });

        let err = provider(&server)
            .fetch_daily_bars("ABC", day(2), day(3))
            .await
            .unwrap_err();

        assert!(matches!(err, ProviderError::Api { status: 403, .. }), "{err}");
    }

    #[tokio::test]
    async fn inverted_window_is_rejected_before_any_request() {
        let server = MockServer::start();
        let err = provider(&server)
            .fetch_daily_bars("ABC", day(3), day(2))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Validation { .. }));
    }
}

//! Store and application configuration.
//!
//! [`StoreConfig`] says where the database lives. It is always an explicit value handed to
//! [`crate::Store::new`]; the library never reads the environment on its own. The binary
//! builds one from [`AppConfig`] (a TOML file) or from the environment via
//! [`StoreConfig::from_env`].
//!
//! Example file:
//! ```toml
//! tickers = ["aapl", "MSFT", " aapl "]
//!
//! [database]
//! url = "sentiment.db"
//!
//! [news]
//! base_url = "https://news.google.com"
//!
//! [prices]
//! csv_dir = "data/prices"
//! lookback_days = 30
//! ```

use std::{collections::HashSet, fmt, path::Path, path::PathBuf};

use anyhow::{Context, bail};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use shared_utils::env::{MissingEnvVarError, get_env_var_opt};

/// Connection target for a [`crate::Store`].
#[derive(Debug)]
pub enum StoreConfig {
    /// Local SQLite database file.
    Sqlite {
        /// Filesystem path (or `file:` URI) of the database.
        path: String,
    },
    /// PostgreSQL server described by its parts.
    Postgres {
        /// Server host name or address.
        host: String,
        /// Database name.
        dbname: String,
        /// Role to connect as.
        user: String,
        /// Role password.
        password: SecretString,
        /// Server port; libpq's default when `None`.
        port: Option<u16>,
    },
    /// PostgreSQL server given as a `postgres://` URL.
    PostgresUrl {
        /// Full connection URL, credentials included.
        url: SecretString,
    },
}

impl StoreConfig {
    /// SQLite database at `path`.
    pub fn sqlite(path: impl Into<String>) -> Self {
        StoreConfig::Sqlite { path: path.into() }
    }

    /// Picks the backend from the URL scheme.
    ///
    /// `postgres://` and `postgresql://` select PostgreSQL. Anything else is a SQLite
    /// location; a leading `sqlite://` or `sqlite:` is stripped.
    pub fn from_database_url(url: &str) -> Self {
        let url = url.trim();
        if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            return StoreConfig::PostgresUrl {
                url: SecretString::from(url.to_string()),
            };
        }
        let path = url
            .strip_prefix("sqlite://")
            .or_else(|| url.strip_prefix("sqlite:"))
            .unwrap_or(url);
        StoreConfig::sqlite(path)
    }

    /// Reads `DATABASE_URL`, or else `DB_HOST`, `DB_NAME`, `DB_USER`, `DB_PASSWORD`
    /// (plus optional `DB_PORT`) from the process environment.
    pub fn from_env() -> Result<Self, MissingEnvVarError> {
        Self::from_vars(get_env_var_opt)
    }

    /// Same resolution as [`StoreConfig::from_env`] over an arbitrary variable lookup.
    pub fn from_vars<F>(lookup: F) -> Result<Self, MissingEnvVarError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("DATABASE_URL") {
            return Ok(Self::from_database_url(&url));
        }
        let required = |name: &str| lookup(name).ok_or_else(|| MissingEnvVarError(name.into()));

        Ok(StoreConfig::Postgres {
            host: required("DB_HOST")?,
            dbname: required("DB_NAME")?,
            user: required("DB_USER")?,
            password: SecretString::from(required("DB_PASSWORD")?),
            port: lookup("DB_PORT").and_then(|p| p.trim().parse().ok()),
        })
    }

    /// Short backend name, for logs.
    pub fn backend(&self) -> &'static str {
        match self {
            StoreConfig::Sqlite { .. } => "sqlite",
            StoreConfig::Postgres { .. } | StoreConfig::PostgresUrl { .. } => "postgres",
        }
    }

    /// libpq connection string for the PostgreSQL variants, `None` for SQLite.
    ///
    /// Part-wise configs are rendered as quoted `key='value'` pairs so passwords may hold
    /// any character.
    pub fn postgres_conninfo(&self) -> Option<SecretString> {
        match self {
            StoreConfig::Sqlite { .. } => None,
            StoreConfig::PostgresUrl { url } => {
                Some(SecretString::from(url.expose_secret().to_string()))
            }
            StoreConfig::Postgres {
                host,
                dbname,
                user,
                password,
                port,
            } => {
                let mut info = format!(
                    "host={} dbname={} user={} password={}",
                    conninfo_value(host),
                    conninfo_value(dbname),
                    conninfo_value(user),
                    conninfo_value(password.expose_secret()),
                );
                if let Some(port) = port {
                    info.push_str(&format!(" port={port}"));
                }
                Some(SecretString::from(info))
            }
        }
    }
}

/// Credential-free description.
impl fmt::Display for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreConfig::Sqlite { path } => write!(f, "sqlite:{path}"),
            StoreConfig::Postgres {
                host, dbname, port, ..
            } => match port {
                Some(port) => write!(f, "postgres:{host}:{port}/{dbname}"),
                None => write!(f, "postgres:{host}/{dbname}"),
            },
            StoreConfig::PostgresUrl { .. } => f.write_str("postgres:<url>"),
        }
    }
}

fn conninfo_value(raw: &str) -> String {
    let escaped = raw.replace('\\', "\\\\").replace('\'', "\\'");
    format!("'{escaped}'")
}

/// Top-level TOML configuration for the `sent-trader` binary.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Tickers to ingest when none are given on the command line.
    ///
    /// Trimmed, uppercased and de-duplicated (first occurrence wins) by [`normalize_tickers`].
    #[serde(default)]
    pub tickers: Vec<String>,
    /// Database location.
    #[serde(default)]
    pub database: DatabaseCfg,
    /// Headline source.
    #[serde(default)]
    pub news: NewsCfg,
    /// Price source.
    #[serde(default)]
    pub prices: PricesCfg,
}

/// `[database]` section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseCfg {
    /// Database URL or SQLite path; falls back to the environment when absent.
    pub url: Option<String>,
}

/// `[news]` section.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewsCfg {
    /// Root of the RSS search endpoint.
    #[serde(default = "default_news_base_url")]
    pub base_url: String,
}

impl Default for NewsCfg {
    fn default() -> Self {
        Self {
            base_url: default_news_base_url(),
        }
    }
}

/// `[prices]` section. At most one of `csv_dir` and `alpaca` may be set; with neither,
/// prices are not ingested.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PricesCfg {
    /// Directory holding one `<TICKER>.csv` file per ticker.
    pub csv_dir: Option<PathBuf>,
    /// Use the Alpaca market data API (credentials from the environment).
    #[serde(default)]
    pub alpaca: bool,
    /// Number of calendar days back from today to request.
    #[serde(default = "default_lookback_days")]
    pub lookback_days: u32,
}

impl Default for PricesCfg {
    fn default() -> Self {
        Self {
            csv_dir: None,
            alpaca: false,
            lookback_days: default_lookback_days(),
        }
    }
}

fn default_news_base_url() -> String {
    news_ingestor::providers::google_news::BASE_URL.to_string()
}

fn default_lookback_days() -> u32 {
    30
}

impl AppConfig {
    /// Store target: `[database].url` when present, the environment otherwise.
    pub fn store_config(&self) -> anyhow::Result<StoreConfig> {
        match &self.database.url {
            Some(url) => Ok(StoreConfig::from_database_url(url)),
            None => StoreConfig::from_env().context("no [database].url configured"),
        }
    }
}

/// Trims, uppercases and de-duplicates tickers, preserving first-seen order.
///
/// Blank entries are rejected.
pub fn normalize_tickers<S: AsRef<str>>(raw: &[S]) -> anyhow::Result<Vec<String>> {
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(raw.len());
    for t in raw {
        let t = t.as_ref().trim().to_ascii_uppercase();
        if t.is_empty() {
            bail!("ticker list contains a blank entry");
        }
        if seen.insert(t.clone()) {
            out.push(t);
        }
    }
    Ok(out)
}

fn normalize_config(mut cfg: AppConfig) -> anyhow::Result<AppConfig> {
    cfg.tickers = normalize_tickers(&cfg.tickers)?;
    cfg.news.base_url = cfg.news.base_url.trim().trim_end_matches('/').to_string();
    if cfg.news.base_url.is_empty() {
        bail!("[news].base_url must not be empty");
    }
    if cfg.prices.alpaca && cfg.prices.csv_dir.is_some() {
        bail!("[prices] accepts either csv_dir or alpaca = true, not both");
    }
    if cfg.prices.lookback_days == 0 {
        bail!("[prices].lookback_days must be at least 1");
    }
    Ok(cfg)
}

/// Parse and normalize configuration from a TOML string.
pub fn load_config_str(s: &str) -> anyhow::Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(s).context("parsing TOML config")?;
    normalize_config(cfg)
}

/// Read, parse and normalize configuration from a file.
pub fn load_config_path<P: AsRef<Path>>(p: P) -> anyhow::Result<AppConfig> {
    let p = p.as_ref();
    let txt = std::fs::read_to_string(p).with_context(|| format!("reading {}", p.display()))?;
    load_config_str(&txt).with_context(|| format!("in config file {}", p.display()))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn url_scheme_selects_backend() {
        assert!(matches!(
            StoreConfig::from_database_url("postgresql://u:p@db/sent"),
            StoreConfig::PostgresUrl { .. }
        ));
        match StoreConfig::from_database_url("sqlite://data/sent.db") {
            StoreConfig::Sqlite { path } => assert_eq!(path, "data/sent.db"),
            other => panic!("unexpected {other:?}"),
        }
        match StoreConfig::from_database_url("/tmp/plain.db") {
            StoreConfig::Sqlite { path } => assert_eq!(path, "/tmp/plain.db"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn vars_prefer_database_url() {
        let vars: HashMap<&str, &str> =
            HashMap::from([("DATABASE_URL", "local.db"), ("DB_HOST", "ignored")]);
        let cfg = StoreConfig::from_vars(|k| vars.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(cfg.backend(), "sqlite");
    }

    #[test]
    fn vars_report_first_missing_part() {
        let vars: HashMap<&str, &str> = HashMap::from([("DB_HOST", "db"), ("DB_NAME", "sent")]);
        let err = StoreConfig::from_vars(|k| vars.get(k).map(|v| v.to_string())).unwrap_err();
        assert_eq!(err, MissingEnvVarError("DB_USER".into()));
    }

    #[test]
    fn conninfo_quotes_values_and_display_hides_password() {
        let cfg = StoreConfig::Postgres {
            host: "db.local".into(),
            dbname: "sent".into(),
            user: "trader".into(),
            password: SecretString::from("it's\\secret".to_string()),
            port: Some(5433),
        };
        let info = cfg.postgres_conninfo().unwrap();
        assert_eq!(
            info.expose_secret(),
            r"host='db.local' dbname='sent' user='trader' password='it\'s\\secret' port=5433"
        );
        let shown = cfg.to_string();
        assert_eq!(shown, "postgres:db.local:5433/sent");
        assert!(!format!("{cfg:?}").contains("it's"));
    }

    #[test]
    fn tickers_are_normalized_in_order() {
        let cfg = load_config_str(
            r#"
            tickers = ["aapl", " MSFT ", "AAPL", "msft", "abc"]
            [database]
            url = "x.db"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.tickers, vec!["AAPL", "MSFT", "ABC"]);
        assert_eq!(cfg.prices.lookback_days, 30);
        assert_eq!(cfg.news.base_url, "https://news.google.com");
    }

    #[test]
    fn rejects_unknown_keys_and_conflicting_price_sources() {
        assert!(load_config_str("tickerz = []").is_err());
        let err = load_config_str(
            r#"
            [prices]
            csv_dir = "p"
            alpaca = true
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("not both"));
    }

    #[test]
    fn blank_ticker_is_an_error() {
        assert!(normalize_tickers(&["ABC", "  "]).is_err());
    }
}

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use news_ingestor::text::{SentimentLabel, SentimentScorer};
use sentiment_store::{
    Store,
    config::{AppConfig, StoreConfig, load_config_path, normalize_tickers},
    export,
    pipeline::{IngestWindow, ingest_ticker},
    providers::{PriceSource, build_news_provider, build_price_provider},
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about = "News sentiment and daily price ingestion")]
struct Cli {
    /// TOML configuration file.
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Database URL or SQLite path; overrides the config file and the environment.
    #[arg(long, global = true, value_name = "URL")]
    database: Option<String>,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Apply pending schema migrations.
    Migrate,
    /// Fetch, score and store headlines (and optionally prices) per ticker.
    Ingest(IngestCmd),
    /// List registered tickers.
    Tickers,
    /// Print stored daily bars for a ticker.
    Prices { ticker: String },
    /// Print stored headlines with their sentiment for a ticker.
    Sentiment { ticker: String },
    /// Write prices.csv and articles.csv.
    Export {
        #[arg(long, value_name = "DIR")]
        out_dir: PathBuf,
    },
}

#[derive(Args)]
struct IngestCmd {
    /// Ticker to ingest; repeatable. Defaults to the config file's list.
    #[arg(long = "ticker", value_name = "TICKER")]
    tickers: Vec<String>,
    /// Read bars from <DIR>/<TICKER>.csv.
    #[arg(long, value_name = "DIR", conflicts_with = "alpaca")]
    prices_dir: Option<PathBuf>,
    /// Fetch bars from Alpaca (APCA_API_KEY_ID / APCA_API_SECRET_KEY).
    #[arg(long)]
    alpaca: bool,
    /// Trailing window of calendar days to request bars for.
    #[arg(long)]
    days: Option<u32>,
}

fn store_config(cli_database: Option<&str>, cfg: &AppConfig) -> Result<StoreConfig> {
    match cli_database {
        Some(url) => Ok(StoreConfig::from_database_url(url)),
        None => cfg.store_config(),
    }
}

async fn run_ingest(store: &Store, cfg: &AppConfig, cmd: IngestCmd) -> Result<()> {
    let tickers = if cmd.tickers.is_empty() {
        cfg.tickers.clone()
    } else {
        normalize_tickers(&cmd.tickers)?
    };
    if tickers.is_empty() {
        anyhow::bail!("no tickers given (use --ticker or `tickers = [...]` in the config file)");
    }

    let source = match (cmd.prices_dir, cmd.alpaca) {
        (Some(dir), _) => PriceSource::CsvDir(dir),
        (None, true) => PriceSource::Alpaca,
        (None, false) => PriceSource::from_cfg(&cfg.prices),
    };
    let news = build_news_provider(&cfg.news).context("building news provider")?;
    let prices = build_price_provider(&source).context("building price provider")?;
    let scorer = SentimentScorer::new();
    let days = cmd.days.unwrap_or(cfg.prices.lookback_days).max(1);
    let window = IngestWindow::trailing(Utc::now().date_naive(), days);

    for ticker in &tickers {
        let report = ingest_ticker(store, &news, prices.as_deref(), &scorer, ticker, window)
            .await
            .with_context(|| format!("ingesting {ticker}"))?;
        println!("{report}");
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = match &cli.config {
        Some(path) => load_config_path(path)?,
        None => AppConfig::default(),
    };
    let store = Store::new(store_config(cli.database.as_deref(), &cfg)?);

    match cli.cmd {
        Cmd::Migrate => {
            store.migrate().context("running migrations")?;
        }
        Cmd::Ingest(cmd) => run_ingest(&store, &cfg, cmd).await?,
        Cmd::Tickers => {
            for symbol in store.list_tickers()? {
                println!("{symbol}");
            }
        }
        Cmd::Prices { ticker } => {
            let ticker = ticker.trim().to_ascii_uppercase();
            for bar in store.get_price_history(&ticker)? {
                println!(
                    "{}\t{}\t{}\t{}\t{}\t{}",
                    bar.date, bar.open, bar.high, bar.low, bar.close, bar.volume
                );
            }
        }
        Cmd::Sentiment { ticker } => {
            let ticker = ticker.trim().to_ascii_uppercase();
            for row in store.get_sentiment_history(&ticker)? {
                let (score, label) = match row.compound_sentiment_score {
                    Some(s) => (format!("{s:.4}"), SentimentLabel::classify(s).to_string()),
                    None => ("-".to_string(), "unscored".to_string()),
                };
                println!("{}\t{score}\t{label}\t{}", row.publish_date, row.title);
            }
        }
        Cmd::Export { out_dir } => {
            let paths = export::export_store(&store, &out_dir)?;
            println!("{}", paths.prices.display());
            println!("{}", paths.articles.display());
        }
    }

    Ok(())
}

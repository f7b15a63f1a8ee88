//! CSV export of the stored tables.
//!
//! Writes `prices.csv` and `articles.csv` into a directory. Both files always start with a
//! header row, even when the table is empty.

use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::Serialize;
use tracing::info;

use crate::{
    models::{ArticleExportRow, ExportTables, PriceExportRow},
    store::Store,
};

/// File name of the price export.
pub const PRICES_FILE: &str = "prices.csv";
/// File name of the article export.
pub const ARTICLES_FILE: &str = "articles.csv";

/// Paths written by [`write_csv`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPaths {
    /// Location of `prices.csv`.
    pub prices: PathBuf,
    /// Location of `articles.csv`.
    pub articles: PathBuf,
}

/// Serializes `rows` as CSV under an explicit header.
pub fn write_rows<W, T>(writer: W, headers: &[&str], rows: &[T]) -> csv::Result<()>
where
    W: Write,
    T: Serialize,
{
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    wtr.write_record(headers)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes both tables into `dir`, creating it if needed.
pub fn write_csv(tables: &ExportTables, dir: &Path) -> anyhow::Result<ExportPaths> {
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    let paths = ExportPaths {
        prices: dir.join(PRICES_FILE),
        articles: dir.join(ARTICLES_FILE),
    };

    let file = fs::File::create(&paths.prices)
        .with_context(|| format!("creating {}", paths.prices.display()))?;
    write_rows(file, &PriceExportRow::HEADERS, &tables.prices)
        .with_context(|| format!("writing {}", paths.prices.display()))?;

    let file = fs::File::create(&paths.articles)
        .with_context(|| format!("creating {}", paths.articles.display()))?;
    write_rows(file, &ArticleExportRow::HEADERS, &tables.articles)
        .with_context(|| format!("writing {}", paths.articles.display()))?;

    info!(
        dir = %dir.display(),
        prices = tables.prices.len(),
        articles = tables.articles.len(),
        "exported tables"
    );
    Ok(paths)
}

/// Reads everything from `store` and writes it into `dir`.
pub fn export_store(store: &Store, dir: &Path) -> anyhow::Result<ExportPaths> {
    let tables = store.export_all()?;
    write_csv(&tables, dir)
}

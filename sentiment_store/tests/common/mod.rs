#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use diesel::QueryableByName;
use diesel::prelude::*;
use diesel::sql_types::{Integer, Text};
use news_ingestor::models::{bar::DailyBar, news::ScoredArticle};
use sentiment_store::{
    Store,
    config::StoreConfig,
    db::{connection, migrate},
};
use std::path::PathBuf;
use tempfile::TempDir;

#[derive(QueryableByName)]
struct JournalMode {
    #[diesel(sql_type = Text)]
    journal_mode: String,
}
#[derive(QueryableByName)]
struct ForeignKeys {
    #[diesel(sql_type = Integer)]
    foreign_keys: i32,
}
#[derive(QueryableByName)]
struct BusyTimeout {
    #[diesel(sql_type = Integer, column_name = "timeout")]
    busy_timeout: i32,
}
#[derive(QueryableByName)]
struct Cnt {
    #[diesel(sql_type = Integer)]
    cnt: i32,
}

pub struct TestDb {
    _dir: TempDir,    // keep alive for the life of the test
    pub path: String, // <tmpdir>/test.db
}

impl TestDb {
    pub fn store(&self) -> Store {
        Store::new(StoreConfig::sqlite(self.path.clone()))
    }
}

pub fn setup_db() -> (TestDb, SqliteConnection) {
    let dir = TempDir::new().expect("tempdir");
    let mut p = PathBuf::from(dir.path());
    p.push("test.db");
    let path = p.to_string_lossy().to_string();

    migrate::run_all(&path).expect("migrations");

    let conn = connection::connect_sqlite(&path).expect("connect");
    (TestDb { _dir: dir, path }, conn)
}

/// Migrated database plus a [`Store`] pointing at it.
pub fn setup_store() -> (TestDb, Store) {
    let (db, _conn) = setup_db();
    let store = db.store();
    (db, store)
}

pub fn assert_sqlite_pragmas(conn: &mut SqliteConnection) {
    use diesel::sql_query;

    let jm: JournalMode = sql_query("PRAGMA journal_mode;").get_result(conn).unwrap();
    assert_eq!(jm.journal_mode.to_lowercase(), "wal"); // WAL is persistent per DB file

    let fk: ForeignKeys = sql_query("PRAGMA foreign_keys;").get_result(conn).unwrap();
    assert_eq!(fk.foreign_keys, 1);

    let bt: BusyTimeout = sql_query("PRAGMA busy_timeout;").get_result(conn).unwrap();
    assert_eq!(bt.busy_timeout, 5000);
}

pub fn count_rows(conn: &mut SqliteConnection, table: &str) -> i32 {
    let c: Cnt = diesel::sql_query(format!("SELECT COUNT(*) AS cnt FROM {table};"))
        .get_result(conn)
        .unwrap();
    c.cnt
}

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    day(y, m, d).and_hms_opt(h, min, 0).unwrap()
}

pub fn bar(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: i64) -> DailyBar {
    DailyBar {
        date,
        open,
        high,
        low,
        close,
        volume,
    }
}

pub fn article(link: &str, title: &str, publish_date: NaiveDateTime, score: f64) -> ScoredArticle {
    ScoredArticle {
        title: title.into(),
        ticker: "ABC".into(),
        publish_date,
        link: link.into(),
        compound_sentiment_score: Some(score),
    }
}

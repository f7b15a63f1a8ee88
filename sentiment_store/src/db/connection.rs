//! Connection helpers.
//!
//! [`connect_sqlite`] opens a connection and applies the PRAGMAs every store connection
//! relies on: WAL journaling, foreign_keys=ON (SQLite leaves FK enforcement off by
//! default), and a 5000ms busy_timeout.

use diesel::{Connection, RunQueryDsl, SqliteConnection, sql_query};
#[cfg(feature = "postgres")]
use secrecy::ExposeSecret;

use crate::{
    config::StoreConfig,
    repo::{RepoError, StockRepo},
};

/// Open a SQLite connection and apply connection-wide PRAGMAs.
pub fn connect_sqlite(database_url: &str) -> anyhow::Result<SqliteConnection> {
    let mut conn = SqliteConnection::establish(database_url)?;

    sql_query("PRAGMA journal_mode=WAL;").execute(&mut conn)?;
    sql_query("PRAGMA foreign_keys=ON;").execute(&mut conn)?;
    sql_query("PRAGMA busy_timeout=5000;").execute(&mut conn)?;
    Ok(conn)
}

/// Open a PostgreSQL connection from a URL or libpq conninfo string.
#[cfg(feature = "postgres")]
pub fn connect_postgres(conninfo: &str) -> anyhow::Result<diesel::PgConnection> {
    Ok(diesel::PgConnection::establish(conninfo)?)
}

/// One open connection to whichever backend a [`StoreConfig`] names.
pub enum StoreConnection {
    /// SQLite connection with PRAGMAs applied.
    Sqlite(SqliteConnection),
    /// PostgreSQL connection.
    #[cfg(feature = "postgres")]
    Postgres(diesel::PgConnection),
}

impl StoreConnection {
    /// Connects to the configured backend.
    ///
    /// A PostgreSQL config in a build without the `postgres` feature fails with
    /// [`RepoError::BackendUnavailable`].
    pub fn open(config: &StoreConfig) -> anyhow::Result<Self> {
        match config {
            StoreConfig::Sqlite { path } => Ok(StoreConnection::Sqlite(connect_sqlite(path)?)),
            #[cfg(feature = "postgres")]
            StoreConfig::Postgres { .. } | StoreConfig::PostgresUrl { .. } => {
                let conninfo = config
                    .postgres_conninfo()
                    .ok_or(RepoError::BackendUnavailable { backend: "postgres" })?;
                Ok(StoreConnection::Postgres(connect_postgres(
                    conninfo.expose_secret(),
                )?))
            }
            #[cfg(not(feature = "postgres"))]
            StoreConfig::Postgres { .. } | StoreConfig::PostgresUrl { .. } => {
                Err(RepoError::BackendUnavailable { backend: "postgres" }.into())
            }
        }
    }

    /// Repository view of this connection.
    pub fn repo(&mut self) -> &mut dyn StockRepo {
        match self {
            StoreConnection::Sqlite(conn) => conn,
            #[cfg(feature = "postgres")]
            StoreConnection::Postgres(conn) => conn,
        }
    }
}

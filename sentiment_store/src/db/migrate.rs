//! Embedded schema migrations, one set per backend.

use anyhow::anyhow;
use diesel::{Connection, SqliteConnection, connection::SimpleConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

use crate::config::StoreConfig;

/// Embedded Diesel migrations for SQLite.
///
/// These are applied by `run_sqlite` to bring the database schema up to date.
pub const SQLITE_MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations/sqlite");

/// Embedded Diesel migrations for PostgreSQL.
#[cfg(feature = "postgres")]
pub const POSTGRES_MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations/postgres");

/// Runs pending Diesel migrations on a SQLite database at the given path.
///
/// This sets the SQLite journal mode to WAL and applies all embedded migrations, returning an error on failure.
pub fn run_sqlite(path: &str) -> anyhow::Result<()> {
    let mut conn = SqliteConnection::establish(path)?;
    conn.batch_execute("PRAGMA journal_mode=WAL;")?;
    let applied = conn
        .run_pending_migrations(SQLITE_MIGRATIONS)
        .map_err(|e| anyhow!(e))?;
    info!(backend = "sqlite", applied = applied.len(), "migrations up to date");

    Ok(())
}

/// Runs pending Diesel migrations on a PostgreSQL database.
///
/// Accepts a `postgres://` URL or a libpq conninfo string.
#[cfg(feature = "postgres")]
pub fn run_postgres(conninfo: &str) -> anyhow::Result<()> {
    let mut conn = diesel::PgConnection::establish(conninfo)?;

    let applied = conn
        .run_pending_migrations(POSTGRES_MIGRATIONS)
        .map_err(|e| anyhow!(e))?;
    info!(backend = "postgres", applied = applied.len(), "migrations up to date");

    Ok(())
}

/// Runs pending migrations for the configured backend.
pub fn run(config: &StoreConfig) -> anyhow::Result<()> {
    match config {
        StoreConfig::Sqlite { path } => run_sqlite(path),
        #[cfg(feature = "postgres")]
        StoreConfig::Postgres { .. } | StoreConfig::PostgresUrl { .. } => {
            use secrecy::ExposeSecret;

            let conninfo = config
                .postgres_conninfo()
                .ok_or_else(|| anyhow!("no PostgreSQL connection string"))?;
            run_postgres(conninfo.expose_secret())
        }
        #[cfg(not(feature = "postgres"))]
        StoreConfig::Postgres { .. } | StoreConfig::PostgresUrl { .. } => Err(
            crate::repo::RepoError::BackendUnavailable { backend: "postgres" }.into(),
        ),
    }
}

/// Runs pending migrations for the given database URL by delegating to the appropriate backend.
///
/// URLs starting with "postgres://" or "postgresql://" select PostgreSQL; anything else
/// (a bare path, or one prefixed with "sqlite:") is treated as a SQLite database.
pub fn run_all(database_url: &str) -> anyhow::Result<()> {
    run(&StoreConfig::from_database_url(database_url))
}

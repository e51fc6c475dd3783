//! SQLite-backed attribute tree store.
//!
//! The store enforces the structural constraints the engine relies on:
//! - unique category names
//! - unique descriptions among siblings (level 0 siblings share a NULL parent)
//! - `category_id` and `parent_id` foreign keys with `ON DELETE RESTRICT`

mod taxonomy_repo;


use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::infrastructure::config::EngineConfig;
use crate::infrastructure::ports::RepoError;

pub use taxonomy_repo::{SqliteTaxonomyRepo, SqliteTaxonomyTx};

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS categories (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        created_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS category_attributes (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        category_id INTEGER NOT NULL REFERENCES categories(id) ON DELETE RESTRICT,
        parent_id INTEGER REFERENCES category_attributes(id) ON DELETE RESTRICT,
        description TEXT NOT NULL,
        level INTEGER NOT NULL CHECK (level >= 0),
        ancestor_path TEXT NOT NULL,
        parent_attribute TEXT,
        created_at TEXT NOT NULL
    )
    "#,
    // NULL parents would never collide in a plain UNIQUE index, so level 0 uses 0.
    r#"
    CREATE UNIQUE INDEX IF NOT EXISTS category_attributes_sibling_description
    ON category_attributes (category_id, COALESCE(parent_id, 0), description)
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS category_attributes_parent
    ON category_attributes (parent_id)
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS category_attributes_level
    ON category_attributes (level, category_id)
    "#,
];

/// Open a connection pool with foreign keys enforced.
pub async fn connect(config: &EngineConfig) -> Result<SqlitePool, RepoError> {
    let options = SqliteConnectOptions::from_str(&config.database_url)
        .map_err(|e| RepoError::database("connect", e))?
        .foreign_keys(true)
        .busy_timeout(config.busy_timeout);

    SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await
        .map_err(|e| RepoError::database("connect", e))
}

/// Single-connection in-memory pool.
///
/// The database lives exactly as long as its one connection, so the pool never
/// retires it.
pub async fn connect_in_memory() -> Result<SqlitePool, RepoError> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .map_err(|e| RepoError::database("connect", e))?
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .map_err(|e| RepoError::database("connect", e))
}

/// Create tables and indexes.
///
/// Safe to call on every startup; every statement is `IF NOT EXISTS`.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), RepoError> {
    for statement in SCHEMA {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| RepoError::database("ensure_schema", e))?;
    }

    tracing::info!("SQLite schema initialized (tables and indexes ensured)");
    Ok(())
}

const SQLITE_CONSTRAINT_FOREIGNKEY: &str = "787";
const SQLITE_CONSTRAINT_TRIGGER: &str = "1811";

/// Translate store errors, keeping constraint failures distinguishable.
pub(crate) fn map_sqlx_error(operation: &'static str, err: sqlx::Error) -> RepoError {
    if let sqlx::Error::Database(db_err) = &err {
        // ON DELETE RESTRICT raises SQLITE_CONSTRAINT_TRIGGER (1811), not the
        // SQLITE_CONSTRAINT_FOREIGNKEY (787) that `kind()` recognises.
        if matches!(
            db_err.code().as_deref(),
            Some(SQLITE_CONSTRAINT_FOREIGNKEY) | Some(SQLITE_CONSTRAINT_TRIGGER)
        ) {
            return RepoError::ForeignKeyViolation(db_err.message().to_string());
        }
        match db_err.kind() {
            sqlx::error::ErrorKind::UniqueViolation => {
                return RepoError::UniqueViolation(db_err.message().to_string());
            }
            sqlx::error::ErrorKind::ForeignKeyViolation => {
                return RepoError::ForeignKeyViolation(db_err.message().to_string());
            }
            _ => {}
        }
    }
    RepoError::database(operation, err)
}

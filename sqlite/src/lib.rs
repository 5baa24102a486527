//! `SQLite` registration store for the check-in tracker.
//!
//! Implements [`RegistrationStore`] on a single `SQLite` file through sqlx.
//! One store is constructed at startup, shared by every request handler and
//! closed once at shutdown.
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE registrations (
//!     id INTEGER PRIMARY KEY AUTOINCREMENT,
//!     event_id TEXT NOT NULL,
//!     user_id TEXT NOT NULL,
//!     manager_name TEXT,
//!     recorded_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
//!     UNIQUE(event_id, user_id)
//! );
//! ```
//!
//! `recorded_at` is filled by `SQLite` in UTC with one-second precision, so
//! rows inserted within the same second are ordered by `id`.
//!
//! # Example
//!
//! ```ignore
//! use checkin_core::{NewRegistration, RegistrationStore};
//! use checkin_sqlite::SqliteRegistrationStore;
//!
//! let store = SqliteRegistrationStore::connect("sqlite://db.sqlite").await?;
//! store.initialize().await?;
//! store.insert(&NewRegistration::new("ev1", "u1", "Alice")).await?;
//! let rows = store.query_by_event("ev1").await?;
//! store.close().await;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use checkin_core::{
    NewRegistration, Registration, RegistrationStore, Result, SchemaStatus, StoreError,
};
use chrono::NaiveDateTime;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;

/// Name of the registrations table.
pub const TABLE_NAME: &str = "registrations";

/// Default pool size when none is configured.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// How long a writer waits for the database lock before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const SQL_TABLE_EXISTS: &str =
    "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1";

const SQL_CREATE_TABLE: &str = r"
CREATE TABLE registrations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    event_id TEXT NOT NULL,
    user_id TEXT NOT NULL,
    manager_name TEXT,
    recorded_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
    UNIQUE(event_id, user_id)
)
";

const SQL_INSERT: &str = r"
INSERT INTO registrations (event_id, user_id, manager_name)
VALUES (?1, ?2, ?3)
";

const SQL_SELECT_BY_EVENT: &str = r"
SELECT event_id, user_id, COALESCE(manager_name, '') AS manager_name, recorded_at
FROM registrations
WHERE event_id = ?1
ORDER BY recorded_at DESC, id DESC
";

const SQL_COUNT: &str = "SELECT COUNT(*) FROM registrations";

#[derive(sqlx::FromRow)]
struct RegistrationRow {
    event_id: String,
    user_id: String,
    manager_name: String,
    recorded_at: NaiveDateTime,
}

impl From<RegistrationRow> for Registration {
    fn from(row: RegistrationRow) -> Self {
        Self {
            event_id: row.event_id,
            user_id: row.user_id,
            manager_name: row.manager_name,
            recorded_at: row.recorded_at.and_utc(),
        }
    }
}

/// `SQLite`-backed registration store.
#[derive(Clone, Debug)]
pub struct SqliteRegistrationStore {
    pool: SqlitePool,
}

impl SqliteRegistrationStore {
    /// Wrap an existing pool.
    ///
    /// An in-memory database (`sqlite::memory:`) must use a pool of one
    /// connection, otherwise every connection sees its own empty database.
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (creating if missing) the database at `database_url` with the
    /// default pool size.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::StorageUnavailable`] if the URL is invalid or
    /// the file cannot be opened.
    pub async fn connect(database_url: &str) -> Result<Self> {
        Self::connect_with(database_url, DEFAULT_MAX_CONNECTIONS).await
    }

    /// Open (creating if missing) the database at `database_url`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::StorageUnavailable`] if the URL is invalid or
    /// the file cannot be opened.
    pub async fn connect_with(database_url: &str, max_connections: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| StoreError::StorageUnavailable(format!("Invalid database URL: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(BUSY_TIMEOUT);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect_with(options)
            .await
            .map_err(|e| StoreError::StorageUnavailable(format!("Failed to connect: {e}")))?;

        tracing::debug!(database_url, max_connections, "Opened SQLite pool");
        Ok(Self::new(pool))
    }

    /// Get the underlying connection pool.
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Total number of registrations across all events.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Storage`] if the read fails.
    pub async fn count(&self) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as(SQL_COUNT)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StoreError::Storage(e.to_string()))?;
        Ok(count)
    }

    /// Close every connection. Later calls fail with [`StoreError::Storage`].
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::debug!("Closed SQLite pool");
    }

    async fn table_exists(&self) -> Result<bool> {
        let found: Option<(String,)> = sqlx::query_as(SQL_TABLE_EXISTS)
            .bind(TABLE_NAME)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                    StoreError::StorageUnavailable(e.to_string())
                }
                other => StoreError::Schema(format!("Failed to inspect schema: {other}")),
            })?;
        Ok(found.is_some())
    }
}

impl RegistrationStore for SqliteRegistrationStore {
    #[tracing::instrument(skip(self), fields(table = TABLE_NAME))]
    async fn initialize(&self) -> Result<SchemaStatus> {
        if self.table_exists().await? {
            tracing::info!("Registrations table already exists");
            return Ok(SchemaStatus::AlreadyExisted);
        }

        if let Err(e) = sqlx::query(SQL_CREATE_TABLE).execute(&self.pool).await {
            // Another process may have created it between the check and the create
            if self.table_exists().await? {
                tracing::info!("Registrations table created concurrently");
                return Ok(SchemaStatus::AlreadyExisted);
            }
            return Err(StoreError::Schema(format!("Failed to create table: {e}")));
        }

        tracing::info!("Registrations table created");
        Ok(SchemaStatus::Created)
    }

    #[tracing::instrument(
        skip(self, registration),
        fields(event_id = %registration.event_id, user_id = %registration.user_id)
    )]
    async fn insert(&self, registration: &NewRegistration) -> Result<()> {
        registration.validate()?;

        sqlx::query(SQL_INSERT)
            .bind(&registration.event_id)
            .bind(&registration.user_id)
            .bind(registration.manager())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_unique_violation() {
                        return registration.duplicate_error();
                    }
                }
                StoreError::Storage(e.to_string())
            })?;

        tracing::debug!("Registration recorded");
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn query_by_event(&self, event_id: &str) -> Result<Vec<Registration>> {
        let rows: Vec<RegistrationRow> = sqlx::query_as(SQL_SELECT_BY_EVENT)
            .bind(event_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::Storage(e.to_string()))?;

        Ok(rows.into_iter().map(Registration::from).collect())
    }
}

//! Repository Layer
//!
//! SQLite repositories for users, events and attendees. All calls go through
//! [`Store::run`], which bounds them with the configured timeout.

pub mod attendee;
pub mod event;
pub mod user;

pub use attendee::AttendeeRepository;
pub use event::EventRepository;
pub use user::UserRepository;

use std::future::Future;
use std::str::FromStr;
use std::time::Duration;

use cv_config::DatabaseConfig;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::{info, warn};

use crate::error::{PlatformError, Result};

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        email TEXT NOT NULL UNIQUE,
        name TEXT NOT NULL,
        password_hash TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS events (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        owner_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        name TEXT NOT NULL,
        description TEXT NOT NULL,
        date TEXT NOT NULL,
        location TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS attendees (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        event_id INTEGER NOT NULL REFERENCES events(id) ON DELETE CASCADE,
        user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        UNIQUE (event_id, user_id)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_events_owner ON events(owner_id)",
    "CREATE INDEX IF NOT EXISTS idx_attendees_user ON attendees(user_id)",
];

/// Shared handle to the relational store.
#[derive(Clone)]
pub struct Store {
    pool: SqlitePool,
    timeout: Duration,
}

impl Store {
    pub fn new(pool: SqlitePool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }

    /// Open a pool for the configured SQLite URL.
    pub async fn connect(cfg: &DatabaseConfig) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(&cfg.url)?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(cfg.timeout());

        // Each connection to `:memory:` is its own database, so pin a single
        // connection that never expires.
        let in_memory = cfg.url.contains(":memory:");
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(cfg.max_connections)
        };

        let pool = pool_options
            .acquire_timeout(cfg.timeout())
            .connect_with(options)
            .await?;

        info!(url = %cfg.url, timeout_ms = cfg.timeout_ms, "Connected to store");
        Ok(Self::new(pool, cfg.timeout()))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Create tables and indexes if they do not exist.
    pub async fn init_schema(&self) -> Result<()> {
        for statement in SCHEMA {
            self.run(sqlx::query(statement).execute(&self.pool)).await?;
        }
        Ok(())
    }

    /// Await a store future, failing with `StoreUnavailable` once the
    /// timeout elapses.
    pub async fn run<T, E, F>(&self, fut: F) -> Result<T>
    where
        F: Future<Output = std::result::Result<T, E>>,
        E: Into<PlatformError>,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result.map_err(Into::into),
            Err(_) => {
                warn!(timeout_ms = self.timeout.as_millis() as u64, "Store call timed out");
                Err(PlatformError::store_unavailable(format!(
                    "store call exceeded {}ms",
                    self.timeout.as_millis()
                )))
            }
        }
    }
}

/// Unique-constraint violation reported by the store.
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

/// Foreign-key violation reported by the store.
pub(crate) fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_foreign_key_violation())
}

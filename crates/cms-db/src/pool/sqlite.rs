//! SQLite connection pool management

use std::str::FromStr;
use std::time::Duration;

use sqlx::migrate::MigrateError;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};

/// Embedded schema migrations (`crates/cms-db/migrations`)
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Connection pool settings
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// SQLite connection URL (`sqlite://path.db?mode=rwc` or `sqlite::memory:`)
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of connections to maintain
    pub min_connections: u32,
    /// Maximum time to wait for a connection
    pub acquire_timeout: Duration,
    /// How long a writer waits on a locked database before failing
    pub busy_timeout: Duration,
    /// Idle time before a connection is closed; `None` keeps connections open
    pub idle_timeout: Option<Duration>,
    /// Maximum lifetime of a connection; `None` never recycles
    pub max_lifetime: Option<Duration>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            url: String::from("sqlite://website.db?mode=rwc"),
            max_connections: 5,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(10),
            busy_timeout: Duration::from_secs(5),
            idle_timeout: Some(Duration::from_secs(300)),
            max_lifetime: Some(Duration::from_secs(1800)),
        }
    }
}

impl PoolConfig {
    /// Pool settings from the application configuration
    pub fn from_app_config(config: &cms_common::DatabaseConfig) -> Self {
        Self {
            url: config.url.clone(),
            max_connections: config.max_connections,
            min_connections: config.min_connections,
            acquire_timeout: config.acquire_timeout(),
            ..Default::default()
        }
    }

    /// A private in-memory database.
    ///
    /// Every SQLite memory connection is its own database, so the pool is
    /// pinned to a single connection that never idles out.
    pub fn in_memory() -> Self {
        Self {
            url: String::from("sqlite::memory:"),
            max_connections: 1,
            min_connections: 1,
            idle_timeout: None,
            max_lifetime: None,
            ..Default::default()
        }
    }

    fn is_memory(&self) -> bool {
        self.url.contains(":memory:") || self.url.contains("mode=memory")
    }
}

/// Create a new SQLite connection pool
///
/// Foreign keys are enforced on every connection; file databases use WAL.
pub async fn create_pool(config: &PoolConfig) -> Result<SqlitePool, sqlx::Error> {
    let mut options = SqliteConnectOptions::from_str(&config.url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(config.busy_timeout);

    if !config.is_memory() {
        options = options.journal_mode(SqliteJournalMode::Wal);
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.acquire_timeout)
        .idle_timeout(config.idle_timeout)
        .max_lifetime(config.max_lifetime)
        .connect_with(options)
        .await?;

    tracing::debug!(url = %config.url, "SQLite pool ready");
    Ok(pool)
}

/// Apply pending migrations
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await?;
    tracing::info!("Database migrations applied");
    Ok(())
}

//! SQLite store holding the `devices` relation
//!
//! The pool is created once by the binary and passed to every component that
//! needs it. SQLite provides the transaction isolation that lets lookups run
//! while an ingestion transaction is open.

use crate::error::StoreError;
use devicenames_common::DeviceKey;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;

pub type StoreResult<T> = Result<T, StoreError>;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://devices.db";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Time a writer waits on a locked database before giving up
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub url: String,
    pub max_connections: u32,
    pub connect_timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
        }
    }
}

impl StoreConfig {
    /// `DATABASE_URL`, `DATABASE_MAX_CONNECTIONS`, `DATABASE_CONNECT_TIMEOUT`
    pub fn from_env() -> StoreResult<Self> {
        let config = Self {
            url: std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            max_connections: std::env::var("DATABASE_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_MAX_CONNECTIONS),
            connect_timeout_secs: std::env::var("DATABASE_CONNECT_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECS),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> StoreResult<()> {
        if self.url.is_empty() {
            return Err(StoreError::Config("Database URL cannot be empty".to_string()));
        }
        if self.max_connections == 0 {
            return Err(StoreError::Config(
                "Database max_connections must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Open a pool on the configured database, creating the file if needed
pub async fn connect(config: &StoreConfig) -> StoreResult<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&config.url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(BUSY_TIMEOUT);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
        .connect_with(options)
        .await?;

    tracing::info!(
        url = %config.url,
        max_connections = config.max_connections,
        "Database connection pool created"
    );

    Ok(pool)
}

/// Private in-memory database with the schema applied.
///
/// Limited to a single connection that is never recycled, because every
/// SQLite `:memory:` connection is its own database.
pub async fn connect_in_memory() -> StoreResult<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;
    migrate(&pool).await?;
    Ok(pool)
}

/// Apply pending migrations from `migrations/`
pub async fn migrate(pool: &SqlitePool) -> StoreResult<()> {
    sqlx::migrate!("../../migrations").run(pool).await?;
    tracing::info!("Database migrations completed");
    Ok(())
}

pub async fn health_check(pool: &SqlitePool) -> StoreResult<()> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Marketing name stored for `key`, if any
pub async fn find_marketing_name(pool: &SqlitePool, key: &DeviceKey) -> StoreResult<Option<String>> {
    let name = sqlx::query_scalar::<_, String>(
        "SELECT marketing_name FROM devices WHERE retail_branding = ? AND model = ? LIMIT 1",
    )
    .bind(key.retail_branding())
    .bind(key.model())
    .fetch_optional(pool)
    .await?;

    Ok(name)
}

pub async fn count_devices(pool: &SqlitePool) -> StoreResult<i64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM devices")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StoreConfig::default();
        assert_eq!(config.url, DEFAULT_DATABASE_URL);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_connections() {
        let config = StoreConfig {
            max_connections: 0,
            ..StoreConfig::default()
        };
        assert!(matches!(config.validate(), Err(StoreError::Config(_))));
    }

    #[tokio::test]
    async fn test_lookup_on_empty_store() {
        let pool = connect_in_memory().await.unwrap();
        health_check(&pool).await.unwrap();
        assert_eq!(count_devices(&pool).await.unwrap(), 0);
        let found = find_marketing_name(&pool, &DeviceKey::new("Google", "Pixel"))
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_lookup_is_exact_on_normalized_key() {
        let pool = connect_in_memory().await.unwrap();
        sqlx::query(
            "INSERT INTO devices (retail_branding, marketing_name, model) VALUES ('google', 'Pixel 8', 'shiba')",
        )
        .execute(&pool)
        .await
        .unwrap();

        let found = find_marketing_name(&pool, &DeviceKey::new("GOOGLE", "Shiba"))
            .await
            .unwrap();
        assert_eq!(found.as_deref(), Some("Pixel 8"));

        let partial = find_marketing_name(&pool, &DeviceKey::new("google", "shib"))
            .await
            .unwrap();
        assert!(partial.is_none());
    }

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let pool = connect_in_memory().await.unwrap();
        migrate(&pool).await.unwrap();
        assert_eq!(count_devices(&pool).await.unwrap(), 0);
    }
}

//! Record stores backing the dashboard pages
//!
//! [`RecordStore`] is the data-access collaborator every page talks to.
//! [`MemoryStore`] keeps records in process; [`PgStore`] persists them in
//! `PostgreSQL` and turns insert triggers into subscriptions.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

pub mod memory;
pub mod models;
pub mod postgres;
pub mod record;

pub use memory::{CallCounts, MemoryStore};
pub use postgres::{AccessLogQueries, ClientQueries, IdeaQueries, PgTable, insert_channel};
pub use record::{ListQuery, RecordStore, StoredRecord, Subscription};

use dashboard_core::config::DatabaseConfig;
use dashboard_core::{Error, Result};
use sqlx::postgres::PgPoolOptions;

// Re-export PgPool for convenience
pub use sqlx::PgPool;
use std::time::Duration;

/// `PostgreSQL` backed store for every collection
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Open a connection pool
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection cannot be established.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout))
            .idle_timeout(Duration::from_secs(config.idle_timeout))
            .connect(&config.url)
            .await
            .map_err(|e| Error::Store(e.to_string()))?;

        Ok(Self { pool })
    }

    /// Wrap an existing pool
    #[must_use]
    pub const fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the connection pool
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create tables and insert triggers
    ///
    /// # Errors
    ///
    /// Returns an error if migrations fail to run.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Store(format!("Migration failed: {e}")))?;

        Ok(())
    }

    /// Health check
    ///
    /// # Errors
    ///
    /// Returns an error if the health check fails.
    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| Error::Store(format!("Health check failed: {e}")))?;

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    fn unreachable_store() -> PgStore {
        let pool = PgPool::connect_lazy("postgresql://invalid:5432/nonexistent").unwrap();
        PgStore::from_pool(pool)
    }

    #[tokio::test]
    async fn test_connect_invalid_url() {
        let config = DatabaseConfig {
            url: "invalid://url".to_string(),
            connect_timeout: 1,
            ..DatabaseConfig::default()
        };

        let result = PgStore::connect(&config).await;
        match result {
            Err(Error::Store(msg)) => assert!(!msg.is_empty()),
            other => panic!("Expected store error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_health_check_fail() {
        let result = unreachable_store().health_check().await;
        match result {
            Err(Error::Store(msg)) => assert!(msg.contains("Health check failed")),
            other => panic!("Expected store error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_migrate_fail() {
        let result = unreachable_store().migrate().await;
        match result {
            Err(Error::Store(msg)) => assert!(msg.contains("Migration failed")),
            other => panic!("Expected store error, got {other:?}"),
        }
    }
}

//! Database connection pool management.

use crate::mysql::MySqlTx;
use crate::traits::Transactional;
use async_trait::async_trait;
use sidesa_config::DatabaseConfig;
use sidesa_core::{SidesaError, SidesaResult};
use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// MySQL connection pool wrapper.
///
/// This is the injected database handle: services open their transactions
/// through its [`Transactional`] implementation.
#[derive(Clone)]
pub struct DatabasePool {
    pool: MySqlPool,
}

impl DatabasePool {
    /// Creates a new database pool from configuration.
    pub async fn new(config: &DatabaseConfig) -> SidesaResult<Self> {
        info!(
            host = %config.host,
            database = %config.name,
            "Connecting to MySQL database..."
        );

        let pool = MySqlPoolOptions::new()
            .min_connections(config.min_connections)
            .max_connections(config.max_connections)
            .acquire_timeout(config.connect_timeout())
            .idle_timeout(Some(config.idle_timeout()))
            .connect(&config.connection_url())
            .await
            .map_err(|e| {
                warn!("Failed to connect to database: {}", e);
                SidesaError::Database(format!("Failed to connect: {}", e))
            })?;

        info!("MySQL connection pool established");
        Ok(Self { pool })
    }

    /// Wraps an existing pool.
    #[must_use]
    pub fn with_pool(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the underlying pool.
    #[must_use]
    pub fn inner(&self) -> &MySqlPool {
        &self.pool
    }

    /// Checks if the database connection is healthy.
    pub async fn health_check(&self) -> SidesaResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| SidesaError::Database(format!("Health check failed: {}", e)))?;
        Ok(())
    }

    /// Runs database migrations.
    pub async fn run_migrations(&self) -> SidesaResult<()> {
        info!("Running database migrations...");
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| SidesaError::Database(format!("Migration failed: {}", e)))?;
        info!("Database migrations completed");
        Ok(())
    }

    /// Closes the database pool.
    pub async fn close(&self) {
        info!("Closing database connection pool...");
        self.pool.close().await;
        info!("Database connection pool closed");
    }
}

#[async_trait]
impl Transactional for DatabasePool {
    type Tx = MySqlTx;

    async fn begin(&self) -> SidesaResult<MySqlTx> {
        debug!("Beginning transaction");
        Ok(self.pool.begin().await?)
    }

    async fn commit(&self, tx: MySqlTx) -> SidesaResult<()> {
        debug!("Committing transaction");
        Ok(tx.commit().await?)
    }

    async fn rollback(&self, tx: MySqlTx) -> SidesaResult<()> {
        debug!("Rolling back transaction");
        Ok(tx.rollback().await?)
    }
}

impl std::fmt::Debug for DatabasePool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabasePool")
            .field("size", &self.pool.size())
            .field("num_idle", &self.pool.num_idle())
            .finish()
    }
}

/// Creates a shared database pool.
pub async fn create_pool(config: &DatabaseConfig) -> SidesaResult<Arc<DatabasePool>> {
    let pool = DatabasePool::new(config).await?;
    Ok(Arc::new(pool))
}

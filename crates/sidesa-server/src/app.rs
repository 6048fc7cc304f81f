//! Application wiring.

use crate::startup::{print_startup_info, shutdown_signal};
use async_trait::async_trait;
use axum::Router;
use sidesa_config::AppConfig;
use sidesa_core::date_format::IndoDateFormatter;
use sidesa_core::{SidesaError, SidesaResult};
use sidesa_repository::{create_pool, DatabasePool, MySqlUserRepository};
use sidesa_rest::{create_router, AppState, ReadinessProbe};
use sidesa_security::Sha1PasswordHasher;
use sidesa_service::{UserService, UserServiceImpl};
use std::sync::Arc;
use tracing::info;

/// Readiness probe backed by the database pool.
#[derive(Debug, Clone)]
pub struct DatabaseReadiness(pub Arc<DatabasePool>);

#[async_trait]
impl ReadinessProbe for DatabaseReadiness {
    async fn check(&self) -> SidesaResult<()> {
        self.0.health_check().await
    }
}

/// Builds and runs the server from a loaded configuration.
#[derive(Debug, Clone)]
pub struct Application {
    config: AppConfig,
}

impl Application {
    /// Creates an application for the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Creates the display formatter for the configured offset.
    pub fn formatter(&self) -> SidesaResult<IndoDateFormatter> {
        IndoDateFormatter::from_utc_offset_hours(self.config.display.utc_offset_hours)
            .map_err(|e| SidesaError::Configuration(e.to_string()))
    }

    /// Wires the user service over `pool` and wraps it in handler state.
    pub fn build_state(&self, pool: Arc<DatabasePool>) -> SidesaResult<AppState> {
        let user_service: Arc<dyn UserService> = Arc::new(UserServiceImpl::new(
            pool.clone(),
            Arc::new(MySqlUserRepository::new()),
            Arc::new(Sha1PasswordHasher),
            self.formatter()?,
        ));

        Ok(AppState::new(user_service, self.config.server.request_timeout())
            .with_readiness(Arc::new(DatabaseReadiness(pool))))
    }

    /// Builds the complete HTTP router over `pool`.
    pub fn build_router(&self, pool: Arc<DatabasePool>) -> SidesaResult<Router> {
        let state = self.build_state(pool)?;
        Ok(create_router(state, &self.config.server))
    }

    /// Connects to the database and serves HTTP until a shutdown signal.
    pub async fn run(self) -> SidesaResult<()> {
        info!("Environment: {}", self.config.app.environment);

        let pool = create_pool(&self.config.database).await?;
        if self.config.database.run_migrations {
            pool.run_migrations().await?;
        }

        let router = self.build_router(pool.clone())?;

        let addr = self.config.server.addr();
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| SidesaError::Internal(format!("Failed to bind {}: {}", addr, e)))?;

        print_startup_info(&addr);

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| SidesaError::Internal(format!("HTTP server error: {}", e)))?;

        pool.close().await;
        info!("Server shutdown complete");
        Ok(())
    }
}

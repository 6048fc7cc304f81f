//! Application state for Axum handlers.

use async_trait::async_trait;
use sidesa_core::{RequestScope, SidesaResult};
use sidesa_service::UserService;
use std::sync::Arc;
use std::time::Duration;

/// Dependency checked by the readiness endpoint.
#[async_trait]
pub trait ReadinessProbe: Send + Sync {
    /// Succeeds when the dependency can serve requests.
    async fn check(&self) -> SidesaResult<()>;
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserService>,
    pub readiness: Option<Arc<dyn ReadinessProbe>>,
    request_timeout: Duration,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(user_service: Arc<dyn UserService>, request_timeout: Duration) -> Self {
        Self {
            user_service,
            readiness: None,
            request_timeout,
        }
    }

    /// Attaches a readiness probe.
    #[must_use]
    pub fn with_readiness(mut self, probe: Arc<dyn ReadinessProbe>) -> Self {
        self.readiness = Some(probe);
        self
    }

    /// Opens the cancellation scope for one request.
    ///
    /// The scope's context is cancelled when the request timeout elapses or
    /// when the handler future is dropped.
    #[must_use]
    pub fn request_scope(&self) -> RequestScope {
        RequestScope::with_timeout(self.request_timeout)
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("request_timeout", &self.request_timeout)
            .field("readiness", &self.readiness.is_some())
            .finish_non_exhaustive()
    }
}

//! Request-scoped cancellation.
//!
//! Every service call receives a [`RequestContext`]. The HTTP layer owns a
//! [`RequestScope`] per request which cancels the context when the request
//! times out or the handler future is dropped (client disconnect).

use crate::{SidesaError, SidesaResult};
use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::{CancellationToken, DropGuard};

/// Cancellation signal shared by everything working on one request.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    token: CancellationToken,
}

impl RequestContext {
    /// Creates a live (not cancelled) context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context that is already cancelled.
    #[must_use]
    pub fn cancelled_context() -> Self {
        let ctx = Self::new();
        ctx.cancel();
        ctx
    }

    /// Cancels the context. Idempotent.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Returns true once the context has been cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Fails with [`SidesaError::Cancelled`] if the context is cancelled.
    pub fn check(&self) -> SidesaResult<()> {
        if self.is_cancelled() {
            return Err(SidesaError::Cancelled);
        }
        Ok(())
    }

    /// Resolves when the context is cancelled.
    pub async fn cancelled(&self) {
        self.token.cancelled().await;
    }

    /// Drives `work` to completion unless the context is cancelled first.
    ///
    /// On cancellation the `work` future is dropped and
    /// [`SidesaError::Cancelled`] is returned.
    pub async fn run<F, T>(&self, work: F) -> SidesaResult<T>
    where
        F: Future<Output = SidesaResult<T>>,
    {
        if self.is_cancelled() {
            return Err(SidesaError::Cancelled);
        }
        self.token
            .run_until_cancelled(work)
            .await
            .unwrap_or(Err(SidesaError::Cancelled))
    }
}

/// Owns the lifetime of a [`RequestContext`].
///
/// Dropping the scope cancels the context and stops the deadline timer.
#[derive(Debug)]
pub struct RequestScope {
    context: RequestContext,
    _guard: DropGuard,
    deadline: Option<JoinHandle<()>>,
}

impl RequestScope {
    /// Creates a scope without a deadline.
    #[must_use]
    pub fn new() -> Self {
        let context = RequestContext::new();
        Self {
            _guard: context.token.clone().drop_guard(),
            context,
            deadline: None,
        }
    }

    /// Creates a scope whose context is cancelled after `timeout`.
    ///
    /// Must be called from within a Tokio runtime.
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        let mut scope = Self::new();
        let token = scope.context.token.clone();
        scope.deadline = Some(tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            token.cancel();
        }));
        scope
    }

    /// Returns the context to pass down to services.
    #[must_use]
    pub fn context(&self) -> &RequestContext {
        &self.context
    }
}

impl Default for RequestScope {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for RequestScope {
    fn drop(&mut self) {
        if let Some(deadline) = self.deadline.take() {
            deadline.abort();
        }
    }
}

//! Repository trait definitions.
//!
//! Transactions are owned by the caller: a service begins one through
//! [`Transactional`], passes `&mut Tx` into every [`UserRepository`] call and
//! commits or rolls back itself. Repositories never begin or finish a
//! transaction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sidesa_core::{NewUser, SidesaResult, User, UserId};

/// Database handle able to open transactions.
#[async_trait]
pub trait Transactional: Send + Sync {
    /// Transaction type handed to repositories.
    type Tx: Send;

    /// Begins a new transaction.
    async fn begin(&self) -> SidesaResult<Self::Tx>;

    /// Commits a transaction.
    async fn commit(&self, tx: Self::Tx) -> SidesaResult<()>;

    /// Rolls back a transaction, discarding its changes.
    async fn rollback(&self, tx: Self::Tx) -> SidesaResult<()>;
}

/// User repository trait.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Transaction type this repository operates within.
    type Tx: Send;

    /// Returns all active users ordered by id.
    async fn find_all(&self, tx: &mut Self::Tx) -> SidesaResult<Vec<User>>;

    /// Finds an active user by ID.
    async fn find_by_id(&self, tx: &mut Self::Tx, id: UserId) -> SidesaResult<Option<User>>;

    /// Finds an active user by email, ignoring case.
    async fn find_by_email(&self, tx: &mut Self::Tx, email: &str) -> SidesaResult<Option<User>>;

    /// Returns all soft-deleted users ordered by id.
    async fn find_all_deleted(&self, tx: &mut Self::Tx) -> SidesaResult<Vec<User>>;

    /// Finds a soft-deleted user by ID.
    async fn find_by_id_deleted(
        &self,
        tx: &mut Self::Tx,
        id: UserId,
    ) -> SidesaResult<Option<User>>;

    /// Inserts a new user and returns the persisted row.
    async fn save(&self, tx: &mut Self::Tx, user: NewUser) -> SidesaResult<User>;

    /// Marks an active user as deleted. Returns whether a row changed.
    async fn soft_delete(
        &self,
        tx: &mut Self::Tx,
        id: UserId,
        at: DateTime<Utc>,
    ) -> SidesaResult<bool>;

    /// Clears the deletion mark of a soft-deleted user. Returns whether a row changed.
    async fn restore(&self, tx: &mut Self::Tx, id: UserId) -> SidesaResult<bool>;
}

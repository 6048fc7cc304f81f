//! Process-local storage backend.
//!
//! A [`MemoryTransaction`] works on a private copy of the table taken at
//! `begin`. Writes are staged in that copy and become visible to other
//! transactions only on commit; rollback simply drops them.

use crate::traits::{Transactional, UserRepository};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use sidesa_core::{NewUser, SidesaResult, User, UserId};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::debug;

type Table = BTreeMap<UserId, User>;

/// In-memory database handle.
///
/// Clones share the same table.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDatabase {
    table: Arc<Mutex<Table>>,
    last_id: Arc<AtomicU64>,
    commits: Arc<AtomicUsize>,
    rollbacks: Arc<AtomicUsize>,
}

impl InMemoryDatabase {
    /// Creates an empty database.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a database pre-populated with committed rows.
    #[must_use]
    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        let db = Self::new();
        for user in users {
            db.seed(user);
        }
        db
    }

    /// Writes a row directly into the committed table.
    pub fn seed(&self, user: User) {
        self.last_id.fetch_max(user.id.into_inner(), Ordering::SeqCst);
        self.table.lock().insert(user.id, user);
    }

    /// Returns a copy of every committed row ordered by id.
    #[must_use]
    pub fn snapshot(&self) -> Vec<User> {
        self.table.lock().values().cloned().collect()
    }

    /// Number of committed transactions.
    #[must_use]
    pub fn commit_count(&self) -> usize {
        self.commits.load(Ordering::SeqCst)
    }

    /// Number of rolled back transactions.
    #[must_use]
    pub fn rollback_count(&self) -> usize {
        self.rollbacks.load(Ordering::SeqCst)
    }
}

/// Transaction over an [`InMemoryDatabase`].
#[derive(Debug)]
pub struct MemoryTransaction {
    working: Table,
    dirty: BTreeSet<UserId>,
    last_id: Arc<AtomicU64>,
}

impl MemoryTransaction {
    fn stage(&mut self, user: User) {
        self.dirty.insert(user.id);
        self.working.insert(user.id, user);
    }

    /// Number of rows this transaction has written.
    #[must_use]
    pub fn pending_changes(&self) -> usize {
        self.dirty.len()
    }
}

#[async_trait]
impl Transactional for InMemoryDatabase {
    type Tx = MemoryTransaction;

    async fn begin(&self) -> SidesaResult<MemoryTransaction> {
        Ok(MemoryTransaction {
            working: self.table.lock().clone(),
            dirty: BTreeSet::new(),
            last_id: Arc::clone(&self.last_id),
        })
    }

    async fn commit(&self, tx: MemoryTransaction) -> SidesaResult<()> {
        let MemoryTransaction {
            mut working, dirty, ..
        } = tx;
        debug!(changes = dirty.len(), "Committing in-memory transaction");

        let mut table = self.table.lock();
        for id in dirty {
            if let Some(user) = working.remove(&id) {
                table.insert(id, user);
            }
        }
        self.commits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn rollback(&self, tx: MemoryTransaction) -> SidesaResult<()> {
        debug!(
            changes = tx.pending_changes(),
            "Rolling back in-memory transaction"
        );
        self.rollbacks.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// User repository over a [`MemoryTransaction`].
#[derive(Debug, Clone, Copy, Default)]
pub struct InMemoryUserRepository;

impl InMemoryUserRepository {
    /// Creates a new in-memory user repository.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

fn collect(tx: &MemoryTransaction, deleted: bool) -> Vec<User> {
    tx.working
        .values()
        .filter(|u| u.is_deleted() == deleted)
        .cloned()
        .collect()
}

fn lookup(tx: &MemoryTransaction, id: UserId, deleted: bool) -> Option<User> {
    tx.working
        .get(&id)
        .filter(|u| u.is_deleted() == deleted)
        .cloned()
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    type Tx = MemoryTransaction;

    async fn find_all(&self, tx: &mut MemoryTransaction) -> SidesaResult<Vec<User>> {
        Ok(collect(tx, false))
    }

    async fn find_by_id(
        &self,
        tx: &mut MemoryTransaction,
        id: UserId,
    ) -> SidesaResult<Option<User>> {
        Ok(lookup(tx, id, false))
    }

    async fn find_by_email(
        &self,
        tx: &mut MemoryTransaction,
        email: &str,
    ) -> SidesaResult<Option<User>> {
        Ok(tx
            .working
            .values()
            .find(|u| !u.is_deleted() && u.has_email(email))
            .cloned())
    }

    async fn find_all_deleted(&self, tx: &mut MemoryTransaction) -> SidesaResult<Vec<User>> {
        Ok(collect(tx, true))
    }

    async fn find_by_id_deleted(
        &self,
        tx: &mut MemoryTransaction,
        id: UserId,
    ) -> SidesaResult<Option<User>> {
        Ok(lookup(tx, id, true))
    }

    async fn save(&self, tx: &mut MemoryTransaction, user: NewUser) -> SidesaResult<User> {
        let id = UserId::new(tx.last_id.fetch_add(1, Ordering::SeqCst) + 1);
        let user = user.into_user(id, Utc::now());
        debug!("Staging insert of user {}", id);
        tx.stage(user.clone());
        Ok(user)
    }

    async fn soft_delete(
        &self,
        tx: &mut MemoryTransaction,
        id: UserId,
        at: DateTime<Utc>,
    ) -> SidesaResult<bool> {
        let Some(mut user) = lookup(tx, id, false) else {
            return Ok(false);
        };
        user.deleted_at = Some(at);
        tx.stage(user);
        Ok(true)
    }

    async fn restore(&self, tx: &mut MemoryTransaction, id: UserId) -> SidesaResult<bool> {
        let Some(mut user) = lookup(tx, id, true) else {
            return Ok(false);
        };
        user.deleted_at = None;
        tx.stage(user);
        Ok(true)
    }
}

//! MySQL user repository implementation.

use crate::traits::UserRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sidesa_core::{NewUser, SidesaError, SidesaResult, User, UserId};
use sqlx::{FromRow, MySql, Transaction};
use tracing::debug;

/// Transaction type used by the MySQL backend.
pub type MySqlTx = Transaction<'static, MySql>;

const USER_COLUMNS: &str = "id, nama, email, password, no_hp, tanggal_lahir, role, \
     profile_file, created_at, updated_at, deleted_at";

/// MySQL user repository implementation.
///
/// Stateless: every query runs on the transaction supplied by the caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlUserRepository;

impl MySqlUserRepository {
    /// Creates a new MySQL user repository.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    async fn fetch_one_where(
        tx: &mut MySqlTx,
        condition: &str,
        id: UserId,
    ) -> SidesaResult<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE id = ? AND {}", USER_COLUMNS, condition);
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id.into_inner())
            .fetch_optional(&mut **tx)
            .await?;

        row.map(User::try_from).transpose()
    }

    async fn fetch_all_where(tx: &mut MySqlTx, condition: &str) -> SidesaResult<Vec<User>> {
        let sql = format!("SELECT {} FROM users WHERE {} ORDER BY id", USER_COLUMNS, condition);
        let rows = sqlx::query_as::<_, UserRow>(&sql)
            .fetch_all(&mut **tx)
            .await?;

        rows.into_iter().map(User::try_from).collect()
    }
}

/// Database row representation of a user.
#[derive(Debug, FromRow)]
struct UserRow {
    id: u64,
    nama: String,
    email: String,
    password: String,
    no_hp: String,
    tanggal_lahir: String,
    role: String,
    profile_file: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl TryFrom<UserRow> for User {
    type Error = SidesaError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: UserId::new(row.id),
            nama: row.nama,
            email: row.email,
            password: row.password,
            no_hp: row.no_hp,
            tanggal_lahir: row.tanggal_lahir,
            role: row.role,
            profile_file: row.profile_file,
            created_at: row.created_at,
            updated_at: row.updated_at,
            deleted_at: row.deleted_at,
        })
    }
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    type Tx = MySqlTx;

    async fn find_all(&self, tx: &mut MySqlTx) -> SidesaResult<Vec<User>> {
        debug!("Finding all active users");
        Self::fetch_all_where(tx, "deleted_at IS NULL").await
    }

    async fn find_by_id(&self, tx: &mut MySqlTx, id: UserId) -> SidesaResult<Option<User>> {
        debug!("Finding user by id: {}", id);
        Self::fetch_one_where(tx, "deleted_at IS NULL", id).await
    }

    async fn find_by_email(&self, tx: &mut MySqlTx, email: &str) -> SidesaResult<Option<User>> {
        debug!("Finding user by email: {}", email);

        // Case-insensitive through the utf8mb4_unicode_ci column collation.
        let sql = format!(
            "SELECT {} FROM users WHERE email = ? AND deleted_at IS NULL ORDER BY id LIMIT 1",
            USER_COLUMNS
        );
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(email.trim())
            .fetch_optional(&mut **tx)
            .await?;

        row.map(User::try_from).transpose()
    }

    async fn find_all_deleted(&self, tx: &mut MySqlTx) -> SidesaResult<Vec<User>> {
        debug!("Finding all deleted users");
        Self::fetch_all_where(tx, "deleted_at IS NOT NULL").await
    }

    async fn find_by_id_deleted(
        &self,
        tx: &mut MySqlTx,
        id: UserId,
    ) -> SidesaResult<Option<User>> {
        debug!("Finding deleted user by id: {}", id);
        Self::fetch_one_where(tx, "deleted_at IS NOT NULL", id).await
    }

    async fn save(&self, tx: &mut MySqlTx, user: NewUser) -> SidesaResult<User> {
        debug!("Saving new user: {}", user.email);

        let now = Utc::now();

        // MySQL doesn't support RETURNING, so insert then select
        let result = sqlx::query(
            r#"
            INSERT INTO users (nama, email, password, no_hp, tanggal_lahir, role,
                               profile_file, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.nama)
        .bind(&user.email)
        .bind(&user.password)
        .bind(&user.no_hp)
        .bind(&user.tanggal_lahir)
        .bind(&user.role)
        .bind(&user.profile_file)
        .bind(now)
        .bind(now)
        .execute(&mut **tx)
        .await?;

        let id = UserId::new(result.last_insert_id());
        Self::fetch_one_where(tx, "deleted_at IS NULL", id)
            .await?
            .ok_or_else(|| SidesaError::Internal("Failed to fetch inserted user".to_string()))
    }

    async fn soft_delete(
        &self,
        tx: &mut MySqlTx,
        id: UserId,
        at: DateTime<Utc>,
    ) -> SidesaResult<bool> {
        debug!("Soft deleting user: {}", id);

        let result = sqlx::query("UPDATE users SET deleted_at = ? WHERE id = ? AND deleted_at IS NULL")
            .bind(at)
            .bind(id.into_inner())
            .execute(&mut **tx)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn restore(&self, tx: &mut MySqlTx, id: UserId) -> SidesaResult<bool> {
        debug!("Restoring user: {}", id);

        let result =
            sqlx::query("UPDATE users SET deleted_at = NULL WHERE id = ? AND deleted_at IS NOT NULL")
                .bind(id.into_inner())
                .execute(&mut **tx)
                .await?;

        Ok(result.rows_affected() > 0)
    }
}

//! User service implementation.
//!
//! Each public operation follows the same protocol: begin a transaction,
//! bail out with `Cancelled` if the request is already gone, run the work
//! under the request's cancellation signal, then commit on success or roll
//! back on any failure.

use crate::dto::{LoginInput, RegisterUserInput, UserDetail, UserView};
use crate::mappers::{to_user_detail, to_user_views};
use crate::messages::{
    BIRTH_DATE_INVALID, EMAIL_NOT_FOUND, EMAIL_TAKEN, FORM_INVALID, PASSWORD_MISMATCH,
    USER_ID_NOT_FOUND,
};
use crate::user_service::UserService;
use async_trait::async_trait;
use chrono::Utc;
use sidesa_core::date_format::{normalize_date, IndoDateFormatter};
use sidesa_core::{
    NewUser, RequestContext, SidesaError, SidesaResult, User, UserId, ValidateExt,
    DEFAULT_ROLE,
};
use sidesa_repository::{Transactional, UserRepository};
use sidesa_security::PasswordHasherInterface;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// User service over any transactional backend.
pub struct UserServiceImpl<D, R>
where
    D: Transactional,
    R: UserRepository<Tx = D::Tx>,
{
    db: Arc<D>,
    user_repository: Arc<R>,
    password_hasher: Arc<dyn PasswordHasherInterface>,
    formatter: IndoDateFormatter,
}

impl<D, R> UserServiceImpl<D, R>
where
    D: Transactional,
    R: UserRepository<Tx = D::Tx>,
{
    /// Creates a new user service.
    pub fn new(
        db: Arc<D>,
        user_repository: Arc<R>,
        password_hasher: Arc<dyn PasswordHasherInterface>,
        formatter: IndoDateFormatter,
    ) -> Self {
        Self {
            db,
            user_repository,
            password_hasher,
            formatter,
        }
    }

    /// Opens a transaction, rolling it back at once if `ctx` is cancelled.
    async fn begin(&self, ctx: &RequestContext) -> SidesaResult<D::Tx> {
        let tx = self.db.begin().await?;
        if let Err(e) = ctx.check() {
            debug!("Request cancelled before work started");
            self.rollback(tx).await;
            return Err(e);
        }
        Ok(tx)
    }

    /// Commits on success, rolls back on failure.
    async fn finish<T>(&self, tx: D::Tx, result: SidesaResult<T>) -> SidesaResult<T> {
        match result {
            Ok(value) => {
                self.db.commit(tx).await?;
                Ok(value)
            }
            Err(e) => {
                self.rollback(tx).await;
                Err(e)
            }
        }
    }

    async fn rollback(&self, tx: D::Tx) {
        if let Err(e) = self.db.rollback(tx).await {
            warn!("Transaction rollback failed: {}", e);
        }
    }

    async fn find_detail(
        &self,
        tx: &mut D::Tx,
        id: UserId,
        deleted: bool,
    ) -> SidesaResult<UserDetail> {
        let user = if deleted {
            self.user_repository.find_by_id_deleted(tx, id).await?
        } else {
            self.user_repository.find_by_id(tx, id).await?
        };
        let user = user.ok_or_else(|| SidesaError::not_found("User", USER_ID_NOT_FOUND))?;
        Ok(to_user_detail(&self.formatter, user))
    }

    async fn register(&self, tx: &mut D::Tx, input: RegisterUserInput) -> SidesaResult<User> {
        input.validate_form(FORM_INVALID)?;

        if input.password != input.password_retype {
            return Err(SidesaError::validation(PASSWORD_MISMATCH));
        }

        let email = input.email.trim();
        if self
            .user_repository
            .find_by_email(tx, email)
            .await?
            .is_some()
        {
            return Err(SidesaError::validation(EMAIL_TAKEN));
        }

        let tanggal_lahir = normalize_date(&input.tanggal_lahir).map_err(|e| {
            debug!("Rejected birth date: {}", e);
            SidesaError::validation(BIRTH_DATE_INVALID)
        })?;

        let new_user = NewUser {
            nama: input.nama.trim().to_string(),
            email: email.to_string(),
            password: self.password_hasher.hash(&input.password),
            no_hp: input.no_hp.trim().to_string(),
            tanggal_lahir,
            role: DEFAULT_ROLE.to_string(),
            profile_file: String::new(),
        };

        self.user_repository.save(tx, new_user).await
    }

    async fn authenticate(&self, tx: &mut D::Tx, input: LoginInput) -> SidesaResult<User> {
        input.validate_form(FORM_INVALID)?;

        let user = self
            .user_repository
            .find_by_email(tx, input.email.trim())
            .await?
            .ok_or_else(|| SidesaError::not_found("User", EMAIL_NOT_FOUND))?;

        match self.password_hasher.verify(&input.password, &user.password) {
            Ok(true) => Ok(user),
            Ok(false) => Err(SidesaError::InvalidCredentials),
            Err(e) => {
                warn!("Stored password digest for user {} is unusable: {}", user.id, e);
                Err(SidesaError::InvalidCredentials)
            }
        }
    }

    async fn soft_delete(&self, tx: &mut D::Tx, id: UserId) -> SidesaResult<()> {
        if self.user_repository.soft_delete(tx, id, Utc::now()).await? {
            Ok(())
        } else {
            Err(SidesaError::not_found("User", USER_ID_NOT_FOUND))
        }
    }

    async fn restore(&self, tx: &mut D::Tx, id: UserId) -> SidesaResult<User> {
        let deleted = self
            .user_repository
            .find_by_id_deleted(tx, id)
            .await?
            .ok_or_else(|| SidesaError::not_found("User", USER_ID_NOT_FOUND))?;

        // Email stays unique among active users.
        if self
            .user_repository
            .find_by_email(tx, &deleted.email)
            .await?
            .is_some()
        {
            return Err(SidesaError::validation(EMAIL_TAKEN));
        }

        if !self.user_repository.restore(tx, id).await? {
            return Err(SidesaError::not_found("User", USER_ID_NOT_FOUND));
        }
        self.user_repository
            .find_by_id(tx, id)
            .await?
            .ok_or_else(|| SidesaError::internal(format!("Restored user {} vanished", id)))
    }
}

#[async_trait]
impl<D, R> UserService for UserServiceImpl<D, R>
where
    D: Transactional + 'static,
    R: UserRepository<Tx = D::Tx> + 'static,
{
    async fn get_all_users(&self, ctx: &RequestContext) -> SidesaResult<Vec<UserView>> {
        debug!("Listing active users");

        let mut tx = self.begin(ctx).await?;
        let result = ctx
            .run(async {
                let users = self.user_repository.find_all(&mut tx).await?;
                Ok(to_user_views(&self.formatter, users))
            })
            .await;
        self.finish(tx, result).await
    }

    async fn get_all_users_deleted(&self, ctx: &RequestContext) -> SidesaResult<Vec<UserView>> {
        debug!("Listing deleted users");

        let mut tx = self.begin(ctx).await?;
        let result = ctx
            .run(async {
                let users = self.user_repository.find_all_deleted(&mut tx).await?;
                Ok(to_user_views(&self.formatter, users))
            })
            .await;
        self.finish(tx, result).await
    }

    async fn get_user_by_id(&self, ctx: &RequestContext, id: UserId) -> SidesaResult<UserDetail> {
        debug!("Getting user: {}", id);

        let mut tx = self.begin(ctx).await?;
        let result = ctx.run(self.find_detail(&mut tx, id, false)).await;
        self.finish(tx, result).await
    }

    async fn get_user_by_id_deleted(
        &self,
        ctx: &RequestContext,
        id: UserId,
    ) -> SidesaResult<UserDetail> {
        debug!("Getting deleted user: {}", id);

        let mut tx = self.begin(ctx).await?;
        let result = ctx.run(self.find_detail(&mut tx, id, true)).await;
        self.finish(tx, result).await
    }

    async fn register_user(
        &self,
        ctx: &RequestContext,
        input: RegisterUserInput,
    ) -> SidesaResult<User> {
        debug!("Registering user: {}", input.email);

        let mut tx = self.begin(ctx).await?;
        let result = ctx.run(self.register(&mut tx, input)).await;
        let user = self.finish(tx, result).await?;

        info!("User registered: {}", user.id);
        Ok(user)
    }

    async fn login(&self, ctx: &RequestContext, input: LoginInput) -> SidesaResult<User> {
        debug!("Login attempt: {}", input.email);

        let mut tx = self.begin(ctx).await?;
        let result = ctx.run(self.authenticate(&mut tx, input)).await;
        let user = self.finish(tx, result).await?;

        info!("User logged in: {}", user.id);
        Ok(user)
    }

    async fn delete_user(&self, ctx: &RequestContext, id: UserId) -> SidesaResult<()> {
        debug!("Deleting user: {}", id);

        let mut tx = self.begin(ctx).await?;
        let result = ctx.run(self.soft_delete(&mut tx, id)).await;
        self.finish(tx, result).await?;

        info!("User soft-deleted: {}", id);
        Ok(())
    }

    async fn restore_user(&self, ctx: &RequestContext, id: UserId) -> SidesaResult<User> {
        debug!("Restoring user: {}", id);

        let mut tx = self.begin(ctx).await?;
        let result = ctx.run(self.restore(&mut tx, id)).await;
        let user = self.finish(tx, result).await?;

        info!("User restored: {}", id);
        Ok(user)
    }
}

impl<D, R> std::fmt::Debug for UserServiceImpl<D, R>
where
    D: Transactional,
    R: UserRepository<Tx = D::Tx>,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserServiceImpl")
            .field("formatter", &self.formatter)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use mockall::mock;
    use sidesa_core::DEFAULT_PROFILE_FILE;
    use sidesa_repository::{InMemoryDatabase, InMemoryUserRepository, MemoryTransaction};
    use sidesa_security::Sha1PasswordHasher;
    use std::time::Duration;

    type MemoryService<R = InMemoryUserRepository> = UserServiceImpl<InMemoryDatabase, R>;

    mock! {
        Hasher {}

        impl PasswordHasherInterface for Hasher {
            fn hash(&self, password: &str) -> String;
            fn verify(&self, password: &str, digest: &str) -> SidesaResult<bool>;
        }
    }

    /// Delegates to the in-memory repository but fails every insert.
    struct FailingSaveRepository(InMemoryUserRepository);

    #[async_trait]
    impl UserRepository for FailingSaveRepository {
        type Tx = MemoryTransaction;

        async fn find_all(&self, tx: &mut MemoryTransaction) -> SidesaResult<Vec<User>> {
            self.0.find_all(tx).await
        }

        async fn find_by_id(
            &self,
            tx: &mut MemoryTransaction,
            id: UserId,
        ) -> SidesaResult<Option<User>> {
            self.0.find_by_id(tx, id).await
        }

        async fn find_by_email(
            &self,
            tx: &mut MemoryTransaction,
            email: &str,
        ) -> SidesaResult<Option<User>> {
            self.0.find_by_email(tx, email).await
        }

        async fn find_all_deleted(&self, tx: &mut MemoryTransaction) -> SidesaResult<Vec<User>> {
            self.0.find_all_deleted(tx).await
        }

        async fn find_by_id_deleted(
            &self,
            tx: &mut MemoryTransaction,
            id: UserId,
        ) -> SidesaResult<Option<User>> {
            self.0.find_by_id_deleted(tx, id).await
        }

        async fn save(&self, _tx: &mut MemoryTransaction, _user: NewUser) -> SidesaResult<User> {
            Err(SidesaError::database("connection reset"))
        }

        async fn soft_delete(
            &self,
            tx: &mut MemoryTransaction,
            id: UserId,
            at: DateTime<Utc>,
        ) -> SidesaResult<bool> {
            // Stage the change, then fail so the caller must roll it back.
            self.0.soft_delete(tx, id, at).await?;
            Err(SidesaError::database("lock wait timeout"))
        }

        async fn restore(&self, tx: &mut MemoryTransaction, id: UserId) -> SidesaResult<bool> {
            self.0.restore(tx, id).await
        }
    }

    /// Never finishes a listing.
    struct StallingRepository(InMemoryUserRepository);

    #[async_trait]
    impl UserRepository for StallingRepository {
        type Tx = MemoryTransaction;

        async fn find_all(&self, _tx: &mut MemoryTransaction) -> SidesaResult<Vec<User>> {
            std::future::pending().await
        }

        async fn find_by_id(
            &self,
            tx: &mut MemoryTransaction,
            id: UserId,
        ) -> SidesaResult<Option<User>> {
            self.0.find_by_id(tx, id).await
        }

        async fn find_by_email(
            &self,
            tx: &mut MemoryTransaction,
            email: &str,
        ) -> SidesaResult<Option<User>> {
            self.0.find_by_email(tx, email).await
        }

        async fn find_all_deleted(&self, tx: &mut MemoryTransaction) -> SidesaResult<Vec<User>> {
            self.0.find_all_deleted(tx).await
        }

        async fn find_by_id_deleted(
            &self,
            tx: &mut MemoryTransaction,
            id: UserId,
        ) -> SidesaResult<Option<User>> {
            self.0.find_by_id_deleted(tx, id).await
        }

        async fn save(&self, tx: &mut MemoryTransaction, user: NewUser) -> SidesaResult<User> {
            self.0.save(tx, user).await
        }

        async fn soft_delete(
            &self,
            tx: &mut MemoryTransaction,
            id: UserId,
            at: DateTime<Utc>,
        ) -> SidesaResult<bool> {
            self.0.soft_delete(tx, id, at).await
        }

        async fn restore(&self, tx: &mut MemoryTransaction, id: UserId) -> SidesaResult<bool> {
            self.0.restore(tx, id).await
        }
    }

    fn service_with<R>(db: &InMemoryDatabase, repo: R) -> MemoryService<R>
    where
        R: UserRepository<Tx = MemoryTransaction> + 'static,
    {
        UserServiceImpl::new(
            Arc::new(db.clone()),
            Arc::new(repo),
            Arc::new(Sha1PasswordHasher::new()),
            IndoDateFormatter::default(),
        )
    }

    fn service(db: &InMemoryDatabase) -> MemoryService {
        service_with(db, InMemoryUserRepository::new())
    }

    fn budi() -> RegisterUserInput {
        RegisterUserInput {
            nama: "Budi".to_string(),
            email: "budi@x.com".to_string(),
            password: "pw1".to_string(),
            password_retype: "pw1".to_string(),
            no_hp: "0811".to_string(),
            tanggal_lahir: "1990-01-01".to_string(),
        }
    }

    fn registrant(email: &str) -> RegisterUserInput {
        RegisterUserInput {
            email: email.to_string(),
            ..budi()
        }
    }

    fn login_input(email: &str, password: &str) -> LoginInput {
        LoginInput {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    fn validation_message(err: SidesaError) -> String {
        match err {
            SidesaError::Validation(message) => message,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    // =============================================================================
    // register_user
    // =============================================================================

    #[tokio::test]
    async fn test_register_user_success() {
        let db = InMemoryDatabase::new();
        let service = service(&db);

        let user = service
            .register_user(&RequestContext::new(), budi())
            .await
            .unwrap();

        assert_eq!(user.id, UserId::new(1));
        assert_eq!(user.nama, "Budi");
        assert_eq!(user.role, "user");
        assert_eq!(user.password, Sha1PasswordHasher::new().hash("pw1"));
        assert_eq!(user.tanggal_lahir, "1990-01-01");
        assert!(user.profile_file.is_empty());
        assert_eq!(db.snapshot().len(), 1);
        assert_eq!(db.commit_count(), 1);
    }

    #[tokio::test]
    async fn test_register_normalizes_birth_date() {
        let db = InMemoryDatabase::new();
        let service = service(&db);

        let input = RegisterUserInput {
            tanggal_lahir: "17/08/1985".to_string(),
            ..budi()
        };
        let user = service
            .register_user(&RequestContext::new(), input)
            .await
            .unwrap();
        assert_eq!(user.tanggal_lahir, "1985-08-17");
    }

    #[tokio::test]
    async fn test_register_duplicate_email_fails_second_time() {
        let db = InMemoryDatabase::new();
        let service = service(&db);
        let ctx = RequestContext::new();

        service.register_user(&ctx, budi()).await.unwrap();
        let err = service
            .register_user(&ctx, registrant("BUDI@X.COM"))
            .await
            .unwrap_err();

        assert_eq!(validation_message(err), EMAIL_TAKEN);
        assert_eq!(db.snapshot().len(), 1);
        assert_eq!(db.rollback_count(), 1);
    }

    #[tokio::test]
    async fn test_register_password_mismatch() {
        let db = InMemoryDatabase::new();
        let service = service(&db);

        let input = RegisterUserInput {
            password_retype: "pw2".to_string(),
            ..budi()
        };
        let err = service
            .register_user(&RequestContext::new(), input)
            .await
            .unwrap_err();

        assert_eq!(validation_message(err), PASSWORD_MISMATCH);
        assert!(db.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_register_mismatch_checked_before_duplicate_email() {
        let db = InMemoryDatabase::new();
        let service = service(&db);
        let ctx = RequestContext::new();
        service.register_user(&ctx, budi()).await.unwrap();

        let input = RegisterUserInput {
            password_retype: "other".to_string(),
            ..budi()
        };
        let err = service.register_user(&ctx, input).await.unwrap_err();
        assert_eq!(validation_message(err), PASSWORD_MISMATCH);
    }

    #[tokio::test]
    async fn test_register_invalid_form() {
        let db = InMemoryDatabase::new();
        let service = service(&db);

        let input = RegisterUserInput {
            nama: "  ".to_string(),
            ..budi()
        };
        let err = service
            .register_user(&RequestContext::new(), input)
            .await
            .unwrap_err();
        assert_eq!(validation_message(err), FORM_INVALID);

        let err = service
            .register_user(&RequestContext::new(), registrant("not-an-email"))
            .await
            .unwrap_err();
        assert_eq!(validation_message(err), FORM_INVALID);
    }

    #[tokio::test]
    async fn test_register_bad_birth_date() {
        let db = InMemoryDatabase::new();
        let service = service(&db);

        let input = RegisterUserInput {
            tanggal_lahir: "31-02-2000".to_string(),
            ..budi()
        };
        let err = service
            .register_user(&RequestContext::new(), input)
            .await
            .unwrap_err();

        assert_eq!(validation_message(err), BIRTH_DATE_INVALID);
        assert!(db.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_register_uses_injected_hasher() {
        let db = InMemoryDatabase::new();
        let mut hasher = MockHasher::new();
        hasher
            .expect_hash()
            .times(1)
            .returning(|password: &str| format!("hashed:{}", password));

        let service: MemoryService = UserServiceImpl::new(
            Arc::new(db.clone()),
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(hasher),
            IndoDateFormatter::default(),
        );

        let user = service
            .register_user(&RequestContext::new(), budi())
            .await
            .unwrap();
        assert_eq!(user.password, "hashed:pw1");
    }

    #[tokio::test]
    async fn test_register_storage_failure_rolls_back() {
        let db = InMemoryDatabase::new();
        let service = service_with(&db, FailingSaveRepository(InMemoryUserRepository::new()));

        let err = service
            .register_user(&RequestContext::new(), budi())
            .await
            .unwrap_err();

        assert!(err.is_storage());
        assert!(db.snapshot().is_empty());
        assert_eq!(db.rollback_count(), 1);
        assert_eq!(db.commit_count(), 0);
    }

    // =============================================================================
    // login
    // =============================================================================

    #[tokio::test]
    async fn test_login_success() {
        let db = InMemoryDatabase::new();
        let service = service(&db);
        let ctx = RequestContext::new();
        let registered = service.register_user(&ctx, budi()).await.unwrap();

        let user = service
            .login(&ctx, login_input("budi@x.com", "pw1"))
            .await
            .unwrap();
        assert_eq!(user.id, registered.id);
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let db = InMemoryDatabase::new();
        let service = service(&db);
        let ctx = RequestContext::new();
        service.register_user(&ctx, budi()).await.unwrap();

        let err = service
            .login(&ctx, login_input("budi@x.com", "wrong"))
            .await
            .unwrap_err();
        assert!(matches!(err, SidesaError::InvalidCredentials));
        assert_eq!(err.to_string(), "Password tidak sesuai");
    }

    #[tokio::test]
    async fn test_login_unknown_email() {
        let db = InMemoryDatabase::new();
        let service = service(&db);

        let err = service
            .login(&RequestContext::new(), login_input("nobody@x.com", "pw1"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), EMAIL_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_login_verify_error_is_invalid_credentials() {
        let db = InMemoryDatabase::new();
        let ctx = RequestContext::new();
        service(&db).register_user(&ctx, budi()).await.unwrap();

        let mut hasher = MockHasher::new();
        hasher
            .expect_verify()
            .times(1)
            .returning(|_, _| Err(SidesaError::internal("corrupt digest")));
        let service: MemoryService = UserServiceImpl::new(
            Arc::new(db.clone()),
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(hasher),
            IndoDateFormatter::default(),
        );

        let err = service
            .login(&ctx, login_input("budi@x.com", "pw1"))
            .await
            .unwrap_err();
        assert!(matches!(err, SidesaError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_login_ignores_deleted_users() {
        let db = InMemoryDatabase::new();
        let service = service(&db);
        let ctx = RequestContext::new();
        let user = service.register_user(&ctx, budi()).await.unwrap();
        service.delete_user(&ctx, user.id).await.unwrap();

        let err = service
            .login(&ctx, login_input("budi@x.com", "pw1"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    // =============================================================================
    // Listings and lookups
    // =============================================================================

    #[tokio::test]
    async fn test_get_all_users_numbers_rows() {
        let db = InMemoryDatabase::new();
        let service = service(&db);
        let ctx = RequestContext::new();
        for email in ["a@x.com", "b@x.com", "c@x.com"] {
            service.register_user(&ctx, registrant(email)).await.unwrap();
        }

        let views = service.get_all_users(&ctx).await.unwrap();
        let indexes: Vec<usize> = views.iter().map(|v| v.index).collect();
        let emails: Vec<&str> = views.iter().map(|v| v.email.as_str()).collect();
        assert_eq!(indexes, vec![1, 2, 3]);
        assert_eq!(emails, vec!["a@x.com", "b@x.com", "c@x.com"]);
        assert!(views.iter().all(|v| v.profile_file == DEFAULT_PROFILE_FILE));
        assert!(views.iter().all(|v| v.tanggal_lahir == "01 Januari 1990"));
    }

    #[tokio::test]
    async fn test_get_all_users_empty() {
        let db = InMemoryDatabase::new();
        let views = service(&db)
            .get_all_users(&RequestContext::new())
            .await
            .unwrap();
        assert!(views.is_empty());
    }

    #[tokio::test]
    async fn test_get_user_by_id() {
        let db = InMemoryDatabase::new();
        let service = service(&db);
        let ctx = RequestContext::new();
        let user = service.register_user(&ctx, budi()).await.unwrap();

        let detail = service.get_user_by_id(&ctx, user.id).await.unwrap();
        assert_eq!(detail.id, user.id);
        assert_eq!(detail.tanggal_lahir, "01 Januari 1990");
        assert_eq!(detail.profile_file, DEFAULT_PROFILE_FILE);
        assert_eq!(detail.created_at, user.created_at);
    }

    #[tokio::test]
    async fn test_get_user_by_id_not_found() {
        let db = InMemoryDatabase::new();
        let err = service(&db)
            .get_user_by_id(&RequestContext::new(), UserId::new(42))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), USER_ID_NOT_FOUND);
    }

    // =============================================================================
    // Soft delete and restore
    // =============================================================================

    #[tokio::test]
    async fn test_delete_and_restore_cycle() {
        let db = InMemoryDatabase::new();
        let service = service(&db);
        let ctx = RequestContext::new();
        let user = service.register_user(&ctx, budi()).await.unwrap();

        service.delete_user(&ctx, user.id).await.unwrap();
        assert!(service.get_all_users(&ctx).await.unwrap().is_empty());
        assert!(service.get_user_by_id(&ctx, user.id).await.is_err());

        let deleted = service.get_all_users_deleted(&ctx).await.unwrap();
        assert_eq!(deleted.len(), 1);
        assert_eq!(deleted[0].index, 1);
        assert!(!deleted[0].deleted_at.is_empty());

        let detail = service.get_user_by_id_deleted(&ctx, user.id).await.unwrap();
        assert!(detail.deleted_at.is_some());

        let restored = service.restore_user(&ctx, user.id).await.unwrap();
        assert!(restored.deleted_at.is_none());
        assert_eq!(service.get_all_users(&ctx).await.unwrap().len(), 1);
        assert!(service.get_all_users_deleted(&ctx).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_missing_user() {
        let db = InMemoryDatabase::new();
        let err = service(&db)
            .delete_user(&RequestContext::new(), UserId::new(9))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_restore_active_user_is_not_found() {
        let db = InMemoryDatabase::new();
        let service = service(&db);
        let ctx = RequestContext::new();
        let user = service.register_user(&ctx, budi()).await.unwrap();

        let err = service.restore_user(&ctx, user.id).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_email_reusable_after_delete() {
        let db = InMemoryDatabase::new();
        let service = service(&db);
        let ctx = RequestContext::new();
        let user = service.register_user(&ctx, budi()).await.unwrap();
        service.delete_user(&ctx, user.id).await.unwrap();

        let again = service.register_user(&ctx, budi()).await.unwrap();
        assert_ne!(again.id, user.id);
    }

    #[tokio::test]
    async fn test_restore_rejected_when_email_taken_by_active_user() {
        let db = InMemoryDatabase::new();
        let service = service(&db);
        let ctx = RequestContext::new();
        let old = service.register_user(&ctx, budi()).await.unwrap();
        service.delete_user(&ctx, old.id).await.unwrap();

        let fresh = RegisterUserInput {
            password: "new".to_string(),
            password_retype: "new".to_string(),
            ..registrant("Budi@X.com")
        };
        let fresh = service.register_user(&ctx, fresh).await.unwrap();

        let err = service.restore_user(&ctx, old.id).await.unwrap_err();
        assert_eq!(validation_message(err), EMAIL_TAKEN);

        let active = service.get_all_users(&ctx).await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, fresh.id);
        assert!(service.get_user_by_id_deleted(&ctx, old.id).await.is_ok());

        let logged_in = service
            .login(&ctx, login_input("budi@x.com", "new"))
            .await
            .unwrap();
        assert_eq!(logged_in.id, fresh.id);
    }

    #[tokio::test]
    async fn test_restore_missing_user_is_not_found() {
        let db = InMemoryDatabase::new();
        let err = service(&db)
            .restore_user(&RequestContext::new(), UserId::new(7))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), USER_ID_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_get_user_by_id_deleted_on_active_user_is_not_found() {
        let db = InMemoryDatabase::new();
        let service = service(&db);
        let ctx = RequestContext::new();
        let user = service.register_user(&ctx, budi()).await.unwrap();

        let err = service
            .get_user_by_id_deleted(&ctx, user.id)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), USER_ID_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_get_all_users_deleted_numbers_rows_and_defaults_profile() {
        let at = DateTime::parse_from_rfc3339("2024-03-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let seeded = |id: u64, email: &str, profile_file: &str| {
            let mut user = NewUser {
                nama: format!("Warga {}", id),
                email: email.to_string(),
                password: "digest".to_string(),
                no_hp: "0812".to_string(),
                tanggal_lahir: "1990-01-01".to_string(),
                role: "user".to_string(),
                profile_file: profile_file.to_string(),
            }
            .into_user(UserId::new(id), at);
            user.deleted_at = Some(at);
            user
        };
        let db = InMemoryDatabase::with_users([
            seeded(1, "a@x.com", ""),
            seeded(2, "b@x.com", "b.png"),
            seeded(3, "c@x.com", ""),
        ]);

        let views = service(&db)
            .get_all_users_deleted(&RequestContext::new())
            .await
            .unwrap();

        let indexes: Vec<usize> = views.iter().map(|v| v.index).collect();
        let profiles: Vec<&str> = views.iter().map(|v| v.profile_file.as_str()).collect();
        assert_eq!(indexes, vec![1, 2, 3]);
        assert_eq!(profiles, vec![DEFAULT_PROFILE_FILE, "b.png", DEFAULT_PROFILE_FILE]);
        assert!(views.iter().all(|v| v.deleted_at == "01 Maret 2024 07:00"));
    }

    #[tokio::test]
    async fn test_failed_delete_leaves_store_unchanged() {
        let db = InMemoryDatabase::new();
        let user = service(&db)
            .register_user(&RequestContext::new(), budi())
            .await
            .unwrap();

        let failing = service_with(&db, FailingSaveRepository(InMemoryUserRepository::new()));
        let err = failing
            .delete_user(&RequestContext::new(), user.id)
            .await
            .unwrap_err();

        assert!(err.is_storage());
        assert!(!db.snapshot()[0].is_deleted());
        assert_eq!(db.rollback_count(), 1);
    }

    // =============================================================================
    // Cancellation
    // =============================================================================

    #[tokio::test]
    async fn test_cancelled_context_makes_no_changes() {
        let db = InMemoryDatabase::new();
        let service = service(&db);

        let err = service
            .register_user(&RequestContext::cancelled_context(), budi())
            .await
            .unwrap_err();

        assert!(matches!(err, SidesaError::Cancelled));
        assert!(db.snapshot().is_empty());
        assert_eq!(db.rollback_count(), 1);
        assert_eq!(db.commit_count(), 0);
    }

    #[tokio::test]
    async fn test_cancelled_context_on_reads() {
        let db = InMemoryDatabase::new();
        let service = service(&db);
        let ctx = RequestContext::cancelled_context();

        assert!(matches!(
            service.get_all_users(&ctx).await,
            Err(SidesaError::Cancelled)
        ));
        assert!(matches!(
            service.get_user_by_id(&ctx, UserId::new(1)).await,
            Err(SidesaError::Cancelled)
        ));
    }

    #[tokio::test]
    async fn test_cancellation_aborts_in_flight_work() {
        let db = InMemoryDatabase::new();
        let service = service_with(&db, StallingRepository(InMemoryUserRepository::new()));
        let ctx = RequestContext::new();

        let canceller = ctx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            canceller.cancel();
        });

        let err = service.get_all_users(&ctx).await.unwrap_err();
        assert!(matches!(err, SidesaError::Cancelled));
        assert_eq!(db.rollback_count(), 1);
    }
}

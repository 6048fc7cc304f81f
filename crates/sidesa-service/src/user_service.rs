//! User service trait definition.

use crate::dto::{LoginInput, RegisterUserInput, UserDetail, UserView};
use async_trait::async_trait;
use sidesa_core::{RequestContext, SidesaResult, User, UserId};

/// User service trait.
///
/// Every call runs in its own transaction and honours cancellation of `ctx`.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Lists active users, numbered from 1.
    async fn get_all_users(&self, ctx: &RequestContext) -> SidesaResult<Vec<UserView>>;

    /// Lists soft-deleted users, numbered from 1.
    async fn get_all_users_deleted(&self, ctx: &RequestContext) -> SidesaResult<Vec<UserView>>;

    /// Gets an active user by ID.
    async fn get_user_by_id(&self, ctx: &RequestContext, id: UserId) -> SidesaResult<UserDetail>;

    /// Gets a soft-deleted user by ID.
    async fn get_user_by_id_deleted(
        &self,
        ctx: &RequestContext,
        id: UserId,
    ) -> SidesaResult<UserDetail>;

    /// Registers a new user.
    async fn register_user(
        &self,
        ctx: &RequestContext,
        input: RegisterUserInput,
    ) -> SidesaResult<User>;

    /// Checks credentials and returns the matching user.
    async fn login(&self, ctx: &RequestContext, input: LoginInput) -> SidesaResult<User>;

    /// Soft-deletes an active user.
    async fn delete_user(&self, ctx: &RequestContext, id: UserId) -> SidesaResult<()>;

    /// Restores a soft-deleted user.
    async fn restore_user(&self, ctx: &RequestContext, id: UserId) -> SidesaResult<User>;
}

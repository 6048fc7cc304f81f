//! User management controller.

use crate::{
    responses::{no_content, ok, ApiResult, AppError},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Router,
};
use sidesa_core::{ErrorResponse, SidesaError, User, UserId};
use sidesa_service::{UserDetail, UserView};
use tracing::debug;

/// Creates the user router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users))
        .route("/deleted", get(list_deleted_users))
        .route("/deleted/:id", get(get_deleted_user))
        .route("/deleted/:id/restore", post(restore_user))
        .route("/:id", get(get_user).delete(delete_user))
}

/// List active users.
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    responses(
        (status = 200, description = "Active users in registration order", body = [UserView])
    )
)]
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Vec<UserView>> {
    debug!("List users request");

    let scope = state.request_scope();
    let users = state.user_service.get_all_users(scope.context()).await?;
    ok(users)
}

/// List soft-deleted users.
#[utoipa::path(
    get,
    path = "/users/deleted",
    tag = "users",
    responses(
        (status = 200, description = "Deleted users in registration order", body = [UserView])
    )
)]
pub async fn list_deleted_users(State(state): State<AppState>) -> ApiResult<Vec<UserView>> {
    debug!("List deleted users request");

    let scope = state.request_scope();
    let users = state
        .user_service
        .get_all_users_deleted(scope.context())
        .await?;
    ok(users)
}

/// Get an active user by ID.
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    params(("id" = u64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User found", body = UserDetail),
        (status = 404, description = "No active user with this ID", body = ErrorResponse)
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<UserDetail> {
    debug!("Get user request: {}", id);

    let user_id = parse_user_id(&id)?;
    let scope = state.request_scope();
    let user = state
        .user_service
        .get_user_by_id(scope.context(), user_id)
        .await?;
    ok(user)
}

/// Get a soft-deleted user by ID.
#[utoipa::path(
    get,
    path = "/users/deleted/{id}",
    tag = "users",
    params(("id" = u64, Path, description = "User ID")),
    responses(
        (status = 200, description = "Deleted user found", body = UserDetail),
        (status = 404, description = "No deleted user with this ID", body = ErrorResponse)
    )
)]
pub async fn get_deleted_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<UserDetail> {
    debug!("Get deleted user request: {}", id);

    let user_id = parse_user_id(&id)?;
    let scope = state.request_scope();
    let user = state
        .user_service
        .get_user_by_id_deleted(scope.context(), user_id)
        .await?;
    ok(user)
}

/// Soft-delete a user.
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "users",
    params(("id" = u64, Path, description = "User ID")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "No active user with this ID", body = ErrorResponse)
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    debug!("Delete user request: {}", id);

    let user_id = parse_user_id(&id)?;
    let scope = state.request_scope();
    state
        .user_service
        .delete_user(scope.context(), user_id)
        .await?;
    Ok(no_content())
}

/// Restore a soft-deleted user.
#[utoipa::path(
    post,
    path = "/users/deleted/{id}/restore",
    tag = "users",
    params(("id" = u64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User restored", body = User),
        (status = 404, description = "No deleted user with this ID", body = ErrorResponse)
    )
)]
pub async fn restore_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<User> {
    debug!("Restore user request: {}", id);

    let user_id = parse_user_id(&id)?;
    let scope = state.request_scope();
    let user = state
        .user_service
        .restore_user(scope.context(), user_id)
        .await?;
    ok(user)
}

/// Helper to parse user ID from path parameter.
fn parse_user_id(id: &str) -> Result<UserId, AppError> {
    id.parse()
        .map_err(|_| AppError(SidesaError::validation(format!("Invalid user ID: {}", id))))
}

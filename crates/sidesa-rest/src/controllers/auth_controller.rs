//! Registration and login controller.

use crate::{
    extractors::FormJson,
    responses::{created, ok, ApiResponse, ApiResult, AppError},
    state::AppState,
};
use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use sidesa_core::{ErrorResponse, User};
use sidesa_service::{LoginInput, RegisterUserInput};
use tracing::debug;

/// Creates the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

/// Register a new user.
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "auth",
    request_body = RegisterUserInput,
    responses(
        (status = 201, description = "User registered", body = User),
        (status = 400, description = "Invalid form, password mismatch, email taken or bad birth date", body = ErrorResponse)
    )
)]
pub async fn register(
    State(state): State<AppState>,
    FormJson(input): FormJson<RegisterUserInput>,
) -> Result<(StatusCode, Json<ApiResponse<User>>), AppError> {
    debug!("Registration request for: {}", input.email);

    let scope = state.request_scope();
    let user = state
        .user_service
        .register_user(scope.context(), input)
        .await?;
    Ok(created(user))
}

/// Login with email and password.
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginInput,
    responses(
        (status = 200, description = "Credentials accepted", body = User),
        (status = 401, description = "Wrong password", body = ErrorResponse),
        (status = 404, description = "Unknown email", body = ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    FormJson(input): FormJson<LoginInput>,
) -> ApiResult<User> {
    debug!("Login request for: {}", input.email);

    let scope = state.request_scope();
    let user = state.user_service.login(scope.context(), input).await?;
    ok(user)
}

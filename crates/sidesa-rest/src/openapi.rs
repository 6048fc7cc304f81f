//! OpenAPI documentation configuration.

use crate::controllers::health_controller::HealthResponse;
use sidesa_core::{ErrorResponse, User, UserId};
use sidesa_service::{LoginInput, RegisterUserInput, UserDetail, UserView};
use utoipa::OpenApi;

/// OpenAPI documentation for the Sidesa API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Sidesa API",
        version = "1.0.0",
        description = "Village user registration and account management"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        crate::controllers::auth_controller::register,
        crate::controllers::auth_controller::login,
        crate::controllers::user_controller::list_users,
        crate::controllers::user_controller::list_deleted_users,
        crate::controllers::user_controller::get_user,
        crate::controllers::user_controller::get_deleted_user,
        crate::controllers::user_controller::delete_user,
        crate::controllers::user_controller::restore_user,
        crate::controllers::health_controller::health_check,
        crate::controllers::health_controller::readiness_check,
        crate::controllers::health_controller::liveness_check,
    ),
    components(
        schemas(
            UserId,
            User,
            ErrorResponse,
            RegisterUserInput,
            LoginInput,
            UserView,
            UserDetail,
            HealthResponse,
        )
    ),
    tags(
        (name = "auth", description = "Registration and login"),
        (name = "users", description = "User listings and soft-delete lifecycle"),
        (name = "health", description = "Health check endpoints")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_user_routes() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        assert!(paths.iter().any(|p| p.as_str() == "/auth/register"));
        assert!(paths.iter().any(|p| p.as_str() == "/users/deleted/{id}/restore"));
        assert!(paths.iter().any(|p| p.as_str() == "/health"));
    }
}

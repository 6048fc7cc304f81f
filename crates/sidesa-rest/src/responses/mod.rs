//! JSON envelope shared by every endpoint.
//!
//! Success bodies look like `{"success": true, "data": ...}` and failures
//! like `{"success": false, "error": {"code": ..., "message": ...}}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use sidesa_core::{ErrorResponse, SidesaError};
use tracing::error;

/// Response envelope.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorResponse>,
}

impl<T> ApiResponse<T> {
    /// Wraps a payload.
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

impl ApiResponse<()> {
    /// Wraps a failure.
    pub fn failure(error: &SidesaError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ErrorResponse::from_error(error)),
        }
    }
}

/// Handler error carrying a [`SidesaError`] to the HTTP boundary.
#[derive(Debug)]
pub struct AppError(pub SidesaError);

impl From<SidesaError> for AppError {
    fn from(err: SidesaError) -> Self {
        Self(err)
    }
}

/// HTTP status for an error class. 499 has no named constant.
pub fn status_for(err: &SidesaError) -> StatusCode {
    StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        if status.is_server_error() {
            error!("Request failed: {}", self.0);
        }
        (status, Json(ApiResponse::failure(&self.0))).into_response()
    }
}

/// Result of a handler that answers 200 with an envelope.
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, AppError>;

/// 200 with `data`.
pub fn ok<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(Json(ApiResponse::success(data)))
}

/// 201 with `data`.
pub fn created<T: Serialize>(data: T) -> (StatusCode, Json<ApiResponse<T>>) {
    (StatusCode::CREATED, Json(ApiResponse::success(data)))
}

/// 204 without a body.
pub fn no_content() -> StatusCode {
    StatusCode::NO_CONTENT
}

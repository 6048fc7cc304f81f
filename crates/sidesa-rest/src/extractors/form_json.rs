//! JSON extractor for form submissions.
//!
//! Malformed bodies are answered with the same enveloped validation error the
//! service uses for invalid forms, instead of Axum's plain-text rejection.

use crate::responses::AppError;
use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use sidesa_core::SidesaError;
use sidesa_service::messages::FORM_INVALID;
use tracing::debug;

/// JSON body extractor that rejects with a 400 form error.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for FormJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
            debug!("Rejected request body: {}", rejection);
            AppError(SidesaError::validation(FORM_INVALID))
        })?;

        Ok(Self(value))
    }
}

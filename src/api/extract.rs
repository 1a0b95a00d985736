//! Request extractors that run `validator` rules before a handler sees the
//! payload.
//!
//! Malformed JSON, missing fields and rule violations all become
//! `400 validation_error` responses, so handlers never touch the database with
//! an invalid request.

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use serde_json::json;
use validator::Validate;

use crate::error::AppError;

/// JSON body deserialized into `T` and validated.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
            AppError::bad_request(
                "Malformed request body",
                json!({ "reason": rejection.body_text() }),
            )
        })?;

        value.validate()?;
        Ok(ValidatedJson(value))
    }
}

/// Query string deserialized into `T` and validated.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidatedQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                AppError::bad_request(
                    "Malformed query string",
                    json!({ "reason": rejection.body_text() }),
                )
            })?;

        value.validate()?;
        Ok(ValidatedQuery(value))
    }
}

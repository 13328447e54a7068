//! Axum extractor for validated payloads
//!
//! This module provides the `Validated<T>` extractor that parses, filters
//! and validates request bodies before they reach handlers.

use super::config::{EntityValidationConfig, Operation};
use crate::core::error::{ApiError, RequestError, ValidationError};
use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Path, RawPathParams, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

/// Path parameter that scopes nested resources to a pet
pub const PET_PATH_PARAM: &str = "pet_id";

/// Types that describe how their payloads are validated
pub trait ValidatableEntity {
    /// Get the validation configuration for a specific operation
    fn validation_config(operation: Operation) -> EntityValidationConfig;
}

/// Axum extractor that validates and filters a JSON payload
///
/// On nested routes (`/pets/{pet_id}/...`) the path's pet is written into
/// the payload as `pet_id`, replacing any value from the body.
///
/// # Usage
///
/// ```rust,ignore
/// pub async fn create<S: Serializer>(
///     Validated(payload, operation, _): Validated<S>,
/// ) -> Result<Json<Value>, ApiError> {
///     // payload is already validated and filtered!
/// }
/// ```
pub struct Validated<T>(pub Value, pub Operation, pub std::marker::PhantomData<T>);

impl<T> Validated<T> {
    /// Create a new validated payload
    pub fn new(payload: Value, operation: Operation) -> Self {
        Self(payload, operation, std::marker::PhantomData)
    }

    /// Get the inner payload
    pub fn into_inner(self) -> Value {
        self.0
    }
}

impl<S, T> FromRequest<S> for Validated<T>
where
    S: Send + Sync,
    T: ValidatableEntity + Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let operation = Operation::from_method(req.method());

        let (mut parts, body) = req.into_parts();
        let path_pet = RawPathParams::from_request_parts(&mut parts, state)
            .await
            .ok()
            .and_then(|params| {
                params
                    .iter()
                    .find(|(name, _)| *name == PET_PATH_PARAM)
                    .and_then(|(_, value)| value.parse::<i64>().ok())
            });
        let req = Request::from_parts(parts, body);

        let Json(mut payload): Json<Value> = Json::from_request(req, state)
            .await
            .map_err(|e| {
                ApiError::Validation(ValidationError::InvalidJson {
                    message: e.body_text(),
                })
            })?;

        if let (Some(pet_id), Value::Object(map)) = (path_pet, &mut payload) {
            map.insert(PET_PATH_PARAM.to_string(), Value::from(pet_id));
        }

        let config = T::validation_config(operation);
        match config.validate_and_filter(payload) {
            Ok(validated) => Ok(Validated::new(validated, operation)),
            Err(errors) => {
                warn!(entity = %config.entity_type, errors = errors.len(), "rejected payload");
                Err(ApiError::Validation(ValidationError::FieldErrors(errors)))
            }
        }
    }
}

/// Path parameters whose parse failures are reported as [`ApiError`]
///
/// Wraps axum's `Path` so `/pets/abc/` answers with the JSON error body
/// instead of a plain-text rejection.
pub struct ResourcePath<T>(pub T);

impl<S, T> FromRequestParts<S> for ResourcePath<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Path::<T>::from_request_parts(parts, state)
            .await
            .map(|Path(value)| ResourcePath(value))
            .map_err(|e| {
                ApiError::Request(RequestError::InvalidPath {
                    message: e.body_text(),
                })
            })
    }
}

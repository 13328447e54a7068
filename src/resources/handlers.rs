//! HTTP handlers for record resources
//!
//! Every handler is generic over a [`Serializer`]; the record type only
//! appears when routes are registered. The `*_nested` variants serve the
//! `/pets/{pet_id}/...` sub-resources.

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
};
use serde_json::Value;
use std::sync::Arc;

use crate::config::ApiConfig;
use crate::core::auth::{AuthPolicy, AuthProvider};
use crate::core::entity::EntityId;
use crate::core::error::{ApiError, ApiResult, RequestError};
use crate::core::validation::{ResourcePath, Validated};
use crate::resources::service::{ResourceService, Scope};
use crate::serializers::{Serializer, SerializerContext};
use crate::storage::EntityStore;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<EntityStore>,
    pub config: Arc<ApiConfig>,
    pub auth: Arc<dyn AuthProvider>,
}

impl AppState {
    /// Resolve the caller and build the serializer context for this request
    pub async fn context(&self, headers: &HeaderMap) -> ApiResult<SerializerContext> {
        let auth = self.auth.extract_context(headers).await.map_err(|e| {
            ApiError::Request(RequestError::Unauthorized {
                message: e.to_string(),
            })
        })?;

        Ok(SerializerContext {
            show_sensitive_info: AuthPolicy::sensitive_info(&self.config.sensitive_roles)
                .check(&auth),
            base_url: self.config.base_url().to_string(),
            current_user: auth.user_id(),
        })
    }

    fn service<'a>(&'a self, ctx: &'a SerializerContext, scope: Scope) -> ResourceService<'a> {
        ResourceService::new(&self.store, ctx, scope)
    }
}

/// GET /{plural}/
pub async fn list<S: Serializer>(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<Value>>> {
    let ctx = state.context(&headers).await?;
    let rows = state.service(&ctx, Scope::All).list::<S>()?;
    Ok(Json(rows))
}

/// POST /{plural}/
pub async fn create<S: Serializer>(
    State(state): State<AppState>,
    headers: HeaderMap,
    Validated(payload, _, _): Validated<S>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let ctx = state.context(&headers).await?;
    let created = state.service(&ctx, Scope::All).create::<S>(payload)?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /{plural}/{id}/
pub async fn retrieve<S: Serializer>(
    State(state): State<AppState>,
    ResourcePath(id): ResourcePath<EntityId>,
    headers: HeaderMap,
) -> ApiResult<Json<Value>> {
    let ctx = state.context(&headers).await?;
    let row = state.service(&ctx, Scope::All).retrieve::<S>(id)?;
    Ok(Json(row))
}

/// PUT or PATCH /{plural}/{id}/
///
/// The method decides which fields must be present; see
/// [`Operation`](crate::core::validation::Operation).
pub async fn update<S: Serializer>(
    State(state): State<AppState>,
    ResourcePath(id): ResourcePath<EntityId>,
    headers: HeaderMap,
    validated: Result<Validated<S>, ApiError>,
) -> ApiResult<Json<Value>> {
    let ctx = state.context(&headers).await?;
    let service = state.service(&ctx, Scope::All);
    // Unknown ids are reported before payload errors
    service.check_visible::<S>(id)?;
    let updated = service.update::<S>(id, validated?.into_inner())?;
    Ok(Json(updated))
}

/// DELETE /{plural}/{id}/
pub async fn destroy<S: Serializer>(
    State(state): State<AppState>,
    ResourcePath(id): ResourcePath<EntityId>,
    headers: HeaderMap,
) -> ApiResult<StatusCode> {
    let ctx = state.context(&headers).await?;
    state.service(&ctx, Scope::All).destroy::<S>(id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /pets/{pet_id}/{plural}/
pub async fn list_nested<S: Serializer>(
    State(state): State<AppState>,
    ResourcePath(pet_id): ResourcePath<EntityId>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<Value>>> {
    let ctx = state.context(&headers).await?;
    let rows = state.service(&ctx, Scope::Pet(pet_id)).list::<S>()?;
    Ok(Json(rows))
}

/// POST /pets/{pet_id}/{plural}/
///
/// The path's pet overrides any `pet_id` in the body.
pub async fn create_nested<S: Serializer>(
    State(state): State<AppState>,
    ResourcePath(pet_id): ResourcePath<EntityId>,
    headers: HeaderMap,
    validated: Result<Validated<S>, ApiError>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let ctx = state.context(&headers).await?;
    let service = state.service(&ctx, Scope::Pet(pet_id));
    service.ensure_scope()?;
    let created = service.create::<S>(validated?.into_inner())?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /pets/{pet_id}/{plural}/{id}/
pub async fn retrieve_nested<S: Serializer>(
    State(state): State<AppState>,
    ResourcePath((pet_id, id)): ResourcePath<(EntityId, EntityId)>,
    headers: HeaderMap,
) -> ApiResult<Json<Value>> {
    let ctx = state.context(&headers).await?;
    let row = state.service(&ctx, Scope::Pet(pet_id)).retrieve::<S>(id)?;
    Ok(Json(row))
}

/// PUT or PATCH /pets/{pet_id}/{plural}/{id}/
pub async fn update_nested<S: Serializer>(
    State(state): State<AppState>,
    ResourcePath((pet_id, id)): ResourcePath<(EntityId, EntityId)>,
    headers: HeaderMap,
    validated: Result<Validated<S>, ApiError>,
) -> ApiResult<Json<Value>> {
    let ctx = state.context(&headers).await?;
    let service = state.service(&ctx, Scope::Pet(pet_id));
    service.check_visible::<S>(id)?;
    let updated = service.update::<S>(id, validated?.into_inner())?;
    Ok(Json(updated))
}

/// DELETE /pets/{pet_id}/{plural}/{id}/
pub async fn destroy_nested<S: Serializer>(
    State(state): State<AppState>,
    ResourcePath((pet_id, id)): ResourcePath<(EntityId, EntityId)>,
    headers: HeaderMap,
) -> ApiResult<StatusCode> {
    let ctx = state.context(&headers).await?;
    state.service(&ctx, Scope::Pet(pet_id)).destroy::<S>(id)?;
    Ok(StatusCode::NO_CONTENT)
}

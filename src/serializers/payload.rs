//! Typed access to a validated payload
//!
//! Field validators have already checked shapes and limits; `Payload`
//! converts values into model types and falls back to the stored value
//! when a field is omitted.

use crate::core::entity::{Entity, EntityId};
use crate::core::error::{ApiError, ApiResult, EntityError};
use crate::storage::EntityStore;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

const REQUIRED: &str = "This field is required.";
const NOT_NULL: &str = "This field may not be null.";

/// Validated write payload
#[derive(Debug, Clone, Default)]
pub struct Payload {
    fields: Map<String, Value>,
}

impl Payload {
    pub fn new(value: Value) -> Self {
        let fields = match value {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self { fields }
    }

    /// A non-null field; `current` is used when the field is omitted
    pub fn required<T: DeserializeOwned>(&self, field: &str, current: Option<T>) -> ApiResult<T> {
        match self.fields.get(field) {
            Some(Value::Null) => Err(ApiError::field(field, NOT_NULL)),
            Some(value) => parse(field, value),
            None => current.ok_or_else(|| ApiError::field(field, REQUIRED)),
        }
    }

    /// A nullable field; an explicit `null` clears it
    pub fn optional<T: DeserializeOwned>(
        &self,
        field: &str,
        current: Option<Option<T>>,
    ) -> ApiResult<Option<T>> {
        match self.fields.get(field) {
            Some(Value::Null) => Ok(None),
            Some(value) => parse(field, value).map(Some),
            None => Ok(current.flatten()),
        }
    }

    /// An integer given as a JSON number or a numeric string
    pub fn integer(&self, field: &str, current: Option<i64>) -> ApiResult<i64> {
        match self.fields.get(field) {
            Some(Value::Null) => Err(ApiError::field(field, NOT_NULL)),
            Some(Value::Number(n)) => n
                .as_i64()
                .ok_or_else(|| ApiError::field(field, "A valid integer is required.")),
            Some(Value::String(s)) => s
                .trim()
                .parse()
                .map_err(|_| ApiError::field(field, "A valid integer is required.")),
            Some(_) => Err(ApiError::field(field, "A valid integer is required.")),
            None => current.ok_or_else(|| ApiError::field(field, REQUIRED)),
        }
    }

    /// An optional reference read from `{field}_id`.
    ///
    /// A supplied id must resolve to an existing `T`.
    pub fn relation<T: Entity>(
        &self,
        store: &EntityStore,
        field: &str,
        current: Option<Option<EntityId>>,
    ) -> ApiResult<Option<EntityId>> {
        let key = format!("{}_id", field);
        match self.fields.get(&key) {
            Some(Value::Null) => Ok(None),
            Some(value) => resolve::<T>(store, field, &key, value).map(Some),
            None => Ok(current.flatten()),
        }
    }

    /// A reference that can never be NULL
    pub fn required_relation<T: Entity>(
        &self,
        store: &EntityStore,
        field: &str,
        current: Option<EntityId>,
    ) -> ApiResult<EntityId> {
        let key = format!("{}_id", field);
        match self.fields.get(&key) {
            Some(Value::Null) => Err(ApiError::field(key, NOT_NULL)),
            Some(value) => resolve::<T>(store, field, &key, value),
            None => current.ok_or_else(|| ApiError::field(key, REQUIRED)),
        }
    }
}

fn parse<T: DeserializeOwned>(field: &str, value: &Value) -> ApiResult<T> {
    serde_json::from_value(value.clone()).map_err(|e| ApiError::field(field, e.to_string()))
}

fn resolve<T: Entity>(
    store: &EntityStore,
    field: &str,
    key: &str,
    value: &Value,
) -> ApiResult<EntityId> {
    let id = value
        .as_i64()
        .ok_or_else(|| ApiError::field(key, "Incorrect type. Expected pk value."))?;
    if !store.exists(T::KIND, id)? {
        return Err(EntityError::ReferenceNotFound {
            field: field.to_string(),
            entity_type: T::KIND,
            id,
        }
        .into());
    }
    Ok(id)
}

//! Serializers: the layer between wire payloads and stored records
//!
//! A serializer owns three concerns for one record type:
//!
//! - **Inbound**: its [`ValidatableEntity`] config validates field shapes,
//!   [`Serializer::build`] turns the payload into a model and
//!   [`Serializer::validate`] runs cross-field and uniqueness checks
//! - **Relations**: foreign keys are written as `{field}_id` and must resolve
//! - **Outbound**: [`Serializer::to_representation`] expands relations into
//!   `{id, name}` objects and redacts contact details
//!
//! Handlers are generic over this trait and hold no per-record logic.

pub mod clinics;
pub mod grooming;
pub mod medical;
pub mod payload;
pub mod pets;
pub mod taxonomy;

pub use clinics::{VetClinicSerializer, VetSerializer};
pub use grooming::{GroomingAppointmentSerializer, PetGroomerSerializer, PetSalonSerializer};
pub use medical::{
    AllergySerializer, IllnessSerializer, ProcedureSerializer, SurgerySerializer,
    TreatmentSerializer, VaccineSerializer, VetVisitSerializer, WeighInSerializer,
};
pub use payload::Payload;
pub use pets::{OwnerSerializer, PetSerializer};
pub use taxonomy::{BreedSerializer, PetTypeSerializer};

use crate::core::entity::{Entity, EntityId, EntityKind, Named};
use crate::core::error::{ApiError, ApiResult};
use crate::core::validation::filters::trim;
use crate::core::validation::validators::{max_length, text};
use crate::core::validation::{EntityValidationConfig, Presence, ValidatableEntity};
use crate::storage::EntityStore;
use serde::Serialize;
use serde_json::{Map, Value, json};
use uuid::Uuid;

/// Fields hidden from callers without access to contact details
pub const SENSITIVE_FIELDS: [&str; 3] = ["gender", "email", "phone"];

/// Per-request information available while shaping representations
#[derive(Debug, Clone, Default)]
pub struct SerializerContext {
    /// Include gender, email and phone of vets and groomers
    pub show_sensitive_info: bool,
    /// Prefix of every hyperlink, without a trailing slash
    pub base_url: String,
    /// The authenticated user, if any
    pub current_user: Option<Uuid>,
}

/// Translation between a wire payload and one record type
pub trait Serializer: ValidatableEntity + Send + Sync + 'static {
    type Model: Entity + Serialize;

    /// Build a model from a validated payload.
    ///
    /// `existing` is the stored record on update; omitted fields keep its values.
    fn build(
        payload: &Payload,
        existing: Option<&Self::Model>,
        store: &EntityStore,
        ctx: &SerializerContext,
    ) -> ApiResult<Self::Model>;

    /// Record-level checks run before the write
    fn validate(
        model: &Self::Model,
        existing: Option<&Self::Model>,
        store: &EntityStore,
    ) -> ApiResult<()> {
        check_unique(store, model, existing)
    }

    /// Outbound representation
    fn to_representation(
        model: &Self::Model,
        store: &EntityStore,
        ctx: &SerializerContext,
    ) -> ApiResult<Value>;
}

/// Declare a trimmed, non-blank text field of at most `max` characters
pub fn text_field(config: &mut EntityValidationConfig, field: &str, presence: Presence, max: usize) {
    config
        .scalar(field, presence)
        .filter(trim())
        .check(text())
        .check(max_length(max));
}

/// Reject a model whose uniqueness key matches another stored record
pub fn check_unique<T: Entity>(
    store: &EntityStore,
    model: &T,
    existing: Option<&T>,
) -> ApiResult<()> {
    store.check_unique(model, existing.map(Entity::id))?;
    Ok(())
}

/// Hyperlink of a record
pub fn url(ctx: &SerializerContext, kind: EntityKind, id: EntityId) -> String {
    format!("{}/{}/{}/", ctx.base_url, kind.plural(), id)
}

/// Stored fields of `model` plus its `url`
pub fn represent<T: Entity + Serialize>(
    model: &T,
    ctx: &SerializerContext,
) -> ApiResult<Map<String, Value>> {
    match serde_json::to_value(model) {
        Ok(Value::Object(mut map)) => {
            map.insert("url".to_string(), Value::String(url(ctx, T::KIND, model.id())));
            Ok(map)
        }
        Ok(_) => Err(ApiError::Internal(format!(
            "{} did not serialize to an object",
            T::KIND
        ))),
        Err(e) => Err(ApiError::Internal(e.to_string())),
    }
}

/// `{id, name}` of a referenced record, or null
pub fn ref_value<T: Named>(store: &EntityStore, id: Option<EntityId>) -> ApiResult<Value> {
    let Some(id) = id else {
        return Ok(Value::Null);
    };
    Ok(store
        .get::<T>(id)?
        .map(|row| json!({ "id": row.id(), "name": row.name() }))
        .unwrap_or(Value::Null))
}

/// Drop contact details unless the context grants them
pub fn redact(map: &mut Map<String, Value>, ctx: &SerializerContext) {
    if !ctx.show_sensitive_info {
        for field in SENSITIVE_FIELDS {
            map.remove(field);
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::core::validation::Operation;

    /// Run a create through validation, build, checks and insert
    pub fn create<S: Serializer>(store: &EntityStore, body: Value) -> ApiResult<S::Model> {
        create_as::<S>(store, body, &SerializerContext::default())
    }

    pub fn create_as<S: Serializer>(
        store: &EntityStore,
        body: Value,
        ctx: &SerializerContext,
    ) -> ApiResult<S::Model> {
        let validated = S::validation_config(Operation::Create).validate_and_filter(body)?;
        let model = S::build(&Payload::new(validated), None, store, ctx)?;
        S::validate(&model, None, store)?;
        Ok(store.insert(model)?)
    }

    /// Run a full or partial update of `existing`
    pub fn update<S: Serializer>(
        store: &EntityStore,
        existing: &S::Model,
        operation: Operation,
        body: Value,
    ) -> ApiResult<S::Model> {
        let validated = S::validation_config(operation).validate_and_filter(body)?;
        let model = S::build(
            &Payload::new(validated),
            Some(existing),
            store,
            &SerializerContext::default(),
        )?;
        S::validate(&model, Some(existing), store)?;
        Ok(store.update(model)?)
    }
}

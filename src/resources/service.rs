//! Scope-aware CRUD operations over the entity store
//!
//! The same operations serve top-level resources and the sub-resources
//! nested under a pet. A [`Scope`] restricts which rows are visible.

use crate::core::entity::{Entity, EntityId, EntityKind};
use crate::core::error::{ApiError, ApiResult};
use crate::serializers::{Payload, Serializer, SerializerContext};
use crate::storage::EntityStore;
use serde_json::Value;
use tracing::{info, warn};

/// Foreign key tying a record to its pet
pub const PET_FIELD: &str = "pet";

/// Rows visible to a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Every row of the table
    All,
    /// Rows belonging to one pet
    Pet(EntityId),
}

impl Scope {
    /// Whether `row` is visible in this scope
    pub fn admits<T: Entity>(&self, row: &T) -> bool {
        match self {
            Scope::All => true,
            Scope::Pet(pet_id) => row.foreign_key(PET_FIELD) == Some(*pet_id),
        }
    }
}

fn kind<S: Serializer>() -> EntityKind {
    <S::Model as Entity>::KIND
}

/// CRUD operations for one request
pub struct ResourceService<'a> {
    store: &'a EntityStore,
    ctx: &'a SerializerContext,
    scope: Scope,
}

impl<'a> ResourceService<'a> {
    pub fn new(store: &'a EntityStore, ctx: &'a SerializerContext, scope: Scope) -> Self {
        Self { store, ctx, scope }
    }

    /// Fail with 404 when the scope's pet does not exist
    pub fn ensure_scope(&self) -> ApiResult<()> {
        match self.scope {
            Scope::All => Ok(()),
            Scope::Pet(pet_id) => {
                if self.store.exists(EntityKind::Pet, pet_id)? {
                    Ok(())
                } else {
                    Err(ApiError::not_found(EntityKind::Pet, pet_id))
                }
            }
        }
    }

    /// Representations of every visible row, ordered by id
    pub fn list<S: Serializer>(&self) -> ApiResult<Vec<Value>> {
        self.ensure_scope()?;
        let scope = self.scope;
        self.store
            .list_where(|row: &S::Model| scope.admits(row))?
            .iter()
            .map(|row| S::to_representation(row, self.store, self.ctx))
            .collect()
    }

    pub fn retrieve<S: Serializer>(&self, id: EntityId) -> ApiResult<Value> {
        let row = self.load::<S>(id)?;
        S::to_representation(&row, self.store, self.ctx)
    }

    /// Build, check and insert a new row from a validated payload
    pub fn create<S: Serializer>(&self, payload: Value) -> ApiResult<Value> {
        self.ensure_scope()?;
        let payload = Payload::new(payload);
        let model = S::build(&payload, None, self.store, self.ctx)?;
        S::validate(&model, None, self.store).inspect_err(|e| {
            warn!(entity = %kind::<S>(), error = %e, "create rejected");
        })?;

        let created = self.store.insert(model)?;
        info!(entity = %kind::<S>(), id = created.id(), "created");
        S::to_representation(&created, self.store, self.ctx)
    }

    /// Apply a full or partial update to a visible row
    pub fn update<S: Serializer>(&self, id: EntityId, payload: Value) -> ApiResult<Value> {
        let existing = self.load::<S>(id)?;
        let payload = Payload::new(payload);
        let mut model = S::build(&payload, Some(&existing), self.store, self.ctx)?;
        model.set_id(existing.id());
        S::validate(&model, Some(&existing), self.store).inspect_err(|e| {
            warn!(entity = %kind::<S>(), id, error = %e, "update rejected");
        })?;

        let updated = self.store.update(model)?;
        info!(entity = %kind::<S>(), id, "updated");
        S::to_representation(&updated, self.store, self.ctx)
    }

    /// Delete a visible row and its dependents
    pub fn destroy<S: Serializer>(&self, id: EntityId) -> ApiResult<()> {
        self.load::<S>(id)?;
        let removed = self.store.delete::<S::Model>(id)?;
        info!(
            entity = %kind::<S>(),
            id,
            cascaded = removed.len().saturating_sub(1),
            "deleted"
        );
        Ok(())
    }

    /// Fail with 404 unless the row exists within the scope
    pub fn check_visible<S: Serializer>(&self, id: EntityId) -> ApiResult<()> {
        self.load::<S>(id).map(|_| ())
    }

    /// Fetch a row, treating rows outside the scope as missing
    fn load<S: Serializer>(&self, id: EntityId) -> ApiResult<S::Model> {
        self.ensure_scope()?;
        self.store
            .get::<S::Model>(id)?
            .filter(|row| self.scope.admits(row))
            .ok_or_else(|| ApiError::not_found(kind::<S>(), id))
    }
}

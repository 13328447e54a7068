//! Pet salon, groomer and grooming appointment serializers
//!
//! Groomers embed their salon's full representation. Appointments embed the
//! groomer's and expose the groomer's salon as `pet_salon`, falling back to
//! the appointment's own salon when the groomer has none.

use super::{Payload, Serializer, SerializerContext, redact, ref_value, represent, text_field};
use crate::core::entity::{EntityId, EntityKind};
use crate::core::error::ApiResult;
use crate::core::field::Gender;
use crate::core::validation::filters::trim;
use crate::core::validation::validators::{datetime, in_list, text};
use crate::core::validation::{EntityValidationConfig, Operation, Presence, ValidatableEntity};
use crate::entities::{GroomingAppointment, Pet, PetGroomer, PetSalon};
use crate::storage::EntityStore;
use serde_json::Value;

pub struct PetSalonSerializer;

impl ValidatableEntity for PetSalonSerializer {
    fn validation_config(operation: Operation) -> EntityValidationConfig {
        let mut config = EntityValidationConfig::new(EntityKind::PetSalon, operation);
        text_field(&mut config, "name", Presence::Required, 250);
        text_field(&mut config, "address", Presence::Required, 255);
        text_field(&mut config, "email", Presence::Optional, 250);
        text_field(&mut config, "phone", Presence::Required, 15);
        config
    }
}

impl Serializer for PetSalonSerializer {
    type Model = PetSalon;

    fn build(
        payload: &Payload,
        existing: Option<&PetSalon>,
        _store: &EntityStore,
        _ctx: &SerializerContext,
    ) -> ApiResult<PetSalon> {
        Ok(PetSalon {
            id: existing.map(|e| e.id).unwrap_or_default(),
            name: payload.required("name", existing.map(|e| e.name.clone()))?,
            address: payload.required("address", existing.map(|e| e.address.clone()))?,
            email: payload.optional("email", existing.map(|e| e.email.clone()))?,
            phone: payload.required("phone", existing.map(|e| e.phone.clone()))?,
        })
    }

    fn to_representation(
        model: &PetSalon,
        _store: &EntityStore,
        ctx: &SerializerContext,
    ) -> ApiResult<Value> {
        Ok(Value::Object(represent(model, ctx)?))
    }
}

/// Full representation of a salon, or null
fn salon_value(
    store: &EntityStore,
    id: Option<EntityId>,
    ctx: &SerializerContext,
) -> ApiResult<Value> {
    let Some(salon) = id.map(|id| store.get::<PetSalon>(id)).transpose()?.flatten() else {
        return Ok(Value::Null);
    };
    PetSalonSerializer::to_representation(&salon, store, ctx)
}

pub struct PetGroomerSerializer;

impl ValidatableEntity for PetGroomerSerializer {
    fn validation_config(operation: Operation) -> EntityValidationConfig {
        let mut config = EntityValidationConfig::new(EntityKind::PetGroomer, operation);
        text_field(&mut config, "name", Presence::Required, 250);
        config
            .scalar("gender", Presence::Required)
            .check(in_list(Gender::CHOICES));
        text_field(&mut config, "email", Presence::Optional, 250);
        text_field(&mut config, "phone", Presence::Optional, 15);
        config.relation("pet_salon", Presence::Optional);
        config
    }
}

impl Serializer for PetGroomerSerializer {
    type Model = PetGroomer;

    fn build(
        payload: &Payload,
        existing: Option<&PetGroomer>,
        store: &EntityStore,
        _ctx: &SerializerContext,
    ) -> ApiResult<PetGroomer> {
        Ok(PetGroomer {
            id: existing.map(|e| e.id).unwrap_or_default(),
            pet_salon: payload.relation::<PetSalon>(
                store,
                "pet_salon",
                existing.map(|e| e.pet_salon),
            )?,
            name: payload.required("name", existing.map(|e| e.name.clone()))?,
            gender: payload.required("gender", existing.map(|e| e.gender))?,
            email: payload.optional("email", existing.map(|e| e.email.clone()))?,
            phone: payload.optional("phone", existing.map(|e| e.phone.clone()))?,
        })
    }

    fn to_representation(
        model: &PetGroomer,
        store: &EntityStore,
        ctx: &SerializerContext,
    ) -> ApiResult<Value> {
        let mut map = represent(model, ctx)?;
        map.insert("pet_salon".to_string(), salon_value(store, model.pet_salon, ctx)?);
        redact(&mut map, ctx);
        Ok(Value::Object(map))
    }
}

pub struct GroomingAppointmentSerializer;

impl ValidatableEntity for GroomingAppointmentSerializer {
    fn validation_config(operation: Operation) -> EntityValidationConfig {
        let mut config = EntityValidationConfig::new(EntityKind::GroomingAppointment, operation);
        text_field(&mut config, "grooming_type", Presence::Required, 100);
        config
            .scalar("notes", Presence::Optional)
            .filter(trim())
            .check(text());
        config.scalar("date", Presence::Required).check(datetime());
        config.relation("pet", Presence::Required);
        config.relation("pet_groomer", Presence::Optional);
        config.relation("pet_salon", Presence::Optional);
        config
    }
}

impl Serializer for GroomingAppointmentSerializer {
    type Model = GroomingAppointment;

    fn build(
        payload: &Payload,
        existing: Option<&GroomingAppointment>,
        store: &EntityStore,
        _ctx: &SerializerContext,
    ) -> ApiResult<GroomingAppointment> {
        Ok(GroomingAppointment {
            id: existing.map(|e| e.id).unwrap_or_default(),
            pet: payload.required_relation::<Pet>(store, "pet", existing.map(|e| e.pet))?,
            pet_groomer: payload.relation::<PetGroomer>(
                store,
                "pet_groomer",
                existing.map(|e| e.pet_groomer),
            )?,
            pet_salon: payload.relation::<PetSalon>(
                store,
                "pet_salon",
                existing.map(|e| e.pet_salon),
            )?,
            grooming_type: payload
                .required("grooming_type", existing.map(|e| e.grooming_type.clone()))?,
            notes: payload.optional("notes", existing.map(|e| e.notes.clone()))?,
            date: payload.required("date", existing.map(|e| e.date))?,
        })
    }

    fn to_representation(
        model: &GroomingAppointment,
        store: &EntityStore,
        ctx: &SerializerContext,
    ) -> ApiResult<Value> {
        let mut map = represent(model, ctx)?;
        map.insert("pet".to_string(), ref_value::<Pet>(store, Some(model.pet))?);

        let groomer = model
            .pet_groomer
            .map(|id| store.get::<PetGroomer>(id))
            .transpose()?
            .flatten();
        let salon = groomer
            .as_ref()
            .and_then(|g| g.pet_salon)
            .or(model.pet_salon);

        let groomer_value = match &groomer {
            Some(groomer) => PetGroomerSerializer::to_representation(groomer, store, ctx)?,
            None => Value::Null,
        };
        map.insert("pet_groomer".to_string(), groomer_value);
        map.insert("pet_salon".to_string(), salon_value(store, salon, ctx)?);
        Ok(Value::Object(map))
    }
}

//! Serializers of medical records
//!
//! Every record except treatments belongs to a pet. Records attended by a
//! vet expose `vet` as `{id, name}` plus a flat `vet_name`.

use super::{
    Payload, Serializer, SerializerContext, check_unique, ref_value, represent, text_field,
};
use crate::core::entity::{EntityId, EntityKind};
use crate::core::error::{ApiError, ApiResult};
use crate::core::field::Weight;
use crate::core::validation::filters::trim;
use crate::core::validation::validators::{date, decimal, integer, non_negative, text};
use crate::core::validation::{EntityValidationConfig, Operation, Presence, ValidatableEntity};
use crate::entities::{
    Allergy, Illness, Pet, Procedure, Surgery, Treatment, Vaccine, Vet, VetVisit, WeighIn,
};
use crate::storage::EntityStore;
use serde_json::{Map, Value};

fn free_text(config: &mut EntityValidationConfig, field: &str) {
    config
        .scalar(field, Presence::Required)
        .filter(trim())
        .check(text());
}

fn date_field(config: &mut EntityValidationConfig, field: &str, presence: Presence) {
    config.scalar(field, presence).check(date());
}

/// Declare the pet and vet references shared by pet records
fn pet_and_vet(config: &mut EntityValidationConfig) {
    config.relation("pet", Presence::Required);
    config.relation("vet", Presence::Optional);
}

fn insert_pet(map: &mut Map<String, Value>, store: &EntityStore, pet: EntityId) -> ApiResult<()> {
    map.insert("pet".to_string(), ref_value::<Pet>(store, Some(pet))?);
    Ok(())
}

fn insert_vet(
    map: &mut Map<String, Value>,
    store: &EntityStore,
    vet: Option<EntityId>,
) -> ApiResult<()> {
    let vet = ref_value::<Vet>(store, vet)?;
    map.insert(
        "vet_name".to_string(),
        vet.get("name").cloned().unwrap_or(Value::Null),
    );
    map.insert("vet".to_string(), vet);
    Ok(())
}

pub struct AllergySerializer;

impl ValidatableEntity for AllergySerializer {
    fn validation_config(operation: Operation) -> EntityValidationConfig {
        let mut config = EntityValidationConfig::new(EntityKind::Allergy, operation);
        text_field(&mut config, "allergen", Presence::Required, 100);
        free_text(&mut config, "reaction");
        date_field(&mut config, "date_of_diagnosis", Presence::Required);
        pet_and_vet(&mut config);
        config
    }
}

impl Serializer for AllergySerializer {
    type Model = Allergy;

    fn build(
        payload: &Payload,
        existing: Option<&Allergy>,
        store: &EntityStore,
        _ctx: &SerializerContext,
    ) -> ApiResult<Allergy> {
        Ok(Allergy {
            id: existing.map(|e| e.id).unwrap_or_default(),
            pet: payload.required_relation::<Pet>(store, "pet", existing.map(|e| e.pet))?,
            vet: payload.relation::<Vet>(store, "vet", existing.map(|e| e.vet))?,
            allergen: payload.required("allergen", existing.map(|e| e.allergen.clone()))?,
            reaction: payload.required("reaction", existing.map(|e| e.reaction.clone()))?,
            date_of_diagnosis: payload
                .required("date_of_diagnosis", existing.map(|e| e.date_of_diagnosis))?,
        })
    }

    fn to_representation(
        model: &Allergy,
        store: &EntityStore,
        ctx: &SerializerContext,
    ) -> ApiResult<Value> {
        let mut map = represent(model, ctx)?;
        insert_pet(&mut map, store, model.pet)?;
        insert_vet(&mut map, store, model.vet)?;
        Ok(Value::Object(map))
    }
}

pub struct WeighInSerializer;

impl ValidatableEntity for WeighInSerializer {
    fn validation_config(operation: Operation) -> EntityValidationConfig {
        let mut config = EntityValidationConfig::new(EntityKind::WeighIn, operation);
        date_field(&mut config, "date", Presence::Required);
        config
            .scalar("weight", Presence::Required)
            .check(non_negative())
            .check(decimal(Weight::MAX_DIGITS, Weight::DECIMAL_PLACES));
        config.relation("pet", Presence::Required);
        config
    }
}

impl Serializer for WeighInSerializer {
    type Model = WeighIn;

    fn build(
        payload: &Payload,
        existing: Option<&WeighIn>,
        store: &EntityStore,
        _ctx: &SerializerContext,
    ) -> ApiResult<WeighIn> {
        Ok(WeighIn {
            id: existing.map(|e| e.id).unwrap_or_default(),
            pet: payload.required_relation::<Pet>(store, "pet", existing.map(|e| e.pet))?,
            date: payload.required("date", existing.map(|e| e.date))?,
            weight: payload.required("weight", existing.map(|e| e.weight))?,
        })
    }

    fn to_representation(
        model: &WeighIn,
        store: &EntityStore,
        ctx: &SerializerContext,
    ) -> ApiResult<Value> {
        let mut map = represent(model, ctx)?;
        insert_pet(&mut map, store, model.pet)?;
        Ok(Value::Object(map))
    }
}

pub struct SurgerySerializer;

impl ValidatableEntity for SurgerySerializer {
    fn validation_config(operation: Operation) -> EntityValidationConfig {
        let mut config = EntityValidationConfig::new(EntityKind::Surgery, operation);
        date_field(&mut config, "date", Presence::Required);
        text_field(&mut config, "name", Presence::Required, 200);
        free_text(&mut config, "description");
        pet_and_vet(&mut config);
        config
    }
}

impl Serializer for SurgerySerializer {
    type Model = Surgery;

    fn build(
        payload: &Payload,
        existing: Option<&Surgery>,
        store: &EntityStore,
        _ctx: &SerializerContext,
    ) -> ApiResult<Surgery> {
        Ok(Surgery {
            id: existing.map(|e| e.id).unwrap_or_default(),
            pet: payload.required_relation::<Pet>(store, "pet", existing.map(|e| e.pet))?,
            vet: payload.relation::<Vet>(store, "vet", existing.map(|e| e.vet))?,
            date: payload.required("date", existing.map(|e| e.date))?,
            name: payload.required("name", existing.map(|e| e.name.clone()))?,
            description: payload
                .required("description", existing.map(|e| e.description.clone()))?,
        })
    }

    fn to_representation(
        model: &Surgery,
        store: &EntityStore,
        ctx: &SerializerContext,
    ) -> ApiResult<Value> {
        let mut map = represent(model, ctx)?;
        insert_pet(&mut map, store, model.pet)?;
        insert_vet(&mut map, store, model.vet)?;
        Ok(Value::Object(map))
    }
}

pub struct ProcedureSerializer;

impl ValidatableEntity for ProcedureSerializer {
    fn validation_config(operation: Operation) -> EntityValidationConfig {
        let mut config = EntityValidationConfig::new(EntityKind::Procedure, operation);
        date_field(&mut config, "date", Presence::Required);
        text_field(&mut config, "name", Presence::Required, 100);
        free_text(&mut config, "description");
        pet_and_vet(&mut config);
        config
    }
}

impl Serializer for ProcedureSerializer {
    type Model = Procedure;

    fn build(
        payload: &Payload,
        existing: Option<&Procedure>,
        store: &EntityStore,
        _ctx: &SerializerContext,
    ) -> ApiResult<Procedure> {
        Ok(Procedure {
            id: existing.map(|e| e.id).unwrap_or_default(),
            pet: payload.required_relation::<Pet>(store, "pet", existing.map(|e| e.pet))?,
            vet: payload.relation::<Vet>(store, "vet", existing.map(|e| e.vet))?,
            date: payload.required("date", existing.map(|e| e.date))?,
            name: payload.required("name", existing.map(|e| e.name.clone()))?,
            description: payload
                .required("description", existing.map(|e| e.description.clone()))?,
        })
    }

    fn to_representation(
        model: &Procedure,
        store: &EntityStore,
        ctx: &SerializerContext,
    ) -> ApiResult<Value> {
        let mut map = represent(model, ctx)?;
        insert_pet(&mut map, store, model.pet)?;
        insert_vet(&mut map, store, model.vet)?;
        Ok(Value::Object(map))
    }
}

pub struct VetVisitSerializer;

impl ValidatableEntity for VetVisitSerializer {
    fn validation_config(operation: Operation) -> EntityValidationConfig {
        let mut config = EntityValidationConfig::new(EntityKind::VetVisit, operation);
        date_field(&mut config, "date", Presence::Required);
        free_text(&mut config, "reason");
        free_text(&mut config, "outcome");
        pet_and_vet(&mut config);
        config
    }
}

impl Serializer for VetVisitSerializer {
    type Model = VetVisit;

    fn build(
        payload: &Payload,
        existing: Option<&VetVisit>,
        store: &EntityStore,
        _ctx: &SerializerContext,
    ) -> ApiResult<VetVisit> {
        Ok(VetVisit {
            id: existing.map(|e| e.id).unwrap_or_default(),
            pet: payload.required_relation::<Pet>(store, "pet", existing.map(|e| e.pet))?,
            vet: payload.relation::<Vet>(store, "vet", existing.map(|e| e.vet))?,
            date: payload.required("date", existing.map(|e| e.date))?,
            reason: payload.required("reason", existing.map(|e| e.reason.clone()))?,
            outcome: payload.required("outcome", existing.map(|e| e.outcome.clone()))?,
        })
    }

    fn to_representation(
        model: &VetVisit,
        store: &EntityStore,
        ctx: &SerializerContext,
    ) -> ApiResult<Value> {
        let mut map = represent(model, ctx)?;
        insert_pet(&mut map, store, model.pet)?;
        insert_vet(&mut map, store, model.vet)?;
        Ok(Value::Object(map))
    }
}

pub struct VaccineSerializer;

impl ValidatableEntity for VaccineSerializer {
    fn validation_config(operation: Operation) -> EntityValidationConfig {
        let mut config = EntityValidationConfig::new(EntityKind::Vaccine, operation);
        text_field(&mut config, "name", Presence::Required, 100);
        text_field(&mut config, "lab_name", Presence::Required, 100);
        config.scalar("lot", Presence::Required).check(integer());
        date_field(&mut config, "expiration_date", Presence::Required);
        date_field(&mut config, "application_date", Presence::Required);
        date_field(&mut config, "next_due_date", Presence::Optional);
        pet_and_vet(&mut config);
        config
    }
}

impl Serializer for VaccineSerializer {
    type Model = Vaccine;

    fn build(
        payload: &Payload,
        existing: Option<&Vaccine>,
        store: &EntityStore,
        _ctx: &SerializerContext,
    ) -> ApiResult<Vaccine> {
        Ok(Vaccine {
            id: existing.map(|e| e.id).unwrap_or_default(),
            pet: payload.required_relation::<Pet>(store, "pet", existing.map(|e| e.pet))?,
            vet: payload.relation::<Vet>(store, "vet", existing.map(|e| e.vet))?,
            name: payload.required("name", existing.map(|e| e.name.clone()))?,
            lab_name: payload.required("lab_name", existing.map(|e| e.lab_name.clone()))?,
            lot: payload.integer("lot", existing.map(|e| e.lot))?,
            expiration_date: payload
                .required("expiration_date", existing.map(|e| e.expiration_date))?,
            application_date: payload
                .required("application_date", existing.map(|e| e.application_date))?,
            next_due_date: payload
                .optional("next_due_date", existing.map(|e| e.next_due_date))?,
        })
    }

    fn validate(
        model: &Vaccine,
        existing: Option<&Vaccine>,
        store: &EntityStore,
    ) -> ApiResult<()> {
        if model
            .next_due_date
            .is_some_and(|due| due < model.application_date)
        {
            return Err(ApiError::field(
                "next_due_date",
                "Next due date cannot be before the application date.",
            ));
        }
        check_unique(store, model, existing)
    }

    fn to_representation(
        model: &Vaccine,
        store: &EntityStore,
        ctx: &SerializerContext,
    ) -> ApiResult<Value> {
        let mut map = represent(model, ctx)?;
        insert_pet(&mut map, store, model.pet)?;
        insert_vet(&mut map, store, model.vet)?;
        Ok(Value::Object(map))
    }
}

pub struct IllnessSerializer;

impl ValidatableEntity for IllnessSerializer {
    fn validation_config(operation: Operation) -> EntityValidationConfig {
        let mut config = EntityValidationConfig::new(EntityKind::Illness, operation);
        text_field(&mut config, "name", Presence::Required, 100);
        free_text(&mut config, "description");
        date_field(&mut config, "date_of_diagnosis", Presence::Required);
        date_field(&mut config, "recovery_date", Presence::Optional);
        pet_and_vet(&mut config);
        config
    }
}

impl Serializer for IllnessSerializer {
    type Model = Illness;

    fn build(
        payload: &Payload,
        existing: Option<&Illness>,
        store: &EntityStore,
        _ctx: &SerializerContext,
    ) -> ApiResult<Illness> {
        Ok(Illness {
            id: existing.map(|e| e.id).unwrap_or_default(),
            pet: payload.required_relation::<Pet>(store, "pet", existing.map(|e| e.pet))?,
            vet: payload.relation::<Vet>(store, "vet", existing.map(|e| e.vet))?,
            name: payload.required("name", existing.map(|e| e.name.clone()))?,
            description: payload
                .required("description", existing.map(|e| e.description.clone()))?,
            date_of_diagnosis: payload
                .required("date_of_diagnosis", existing.map(|e| e.date_of_diagnosis))?,
            recovery_date: payload
                .optional("recovery_date", existing.map(|e| e.recovery_date))?,
        })
    }

    fn validate(
        model: &Illness,
        existing: Option<&Illness>,
        store: &EntityStore,
    ) -> ApiResult<()> {
        if model
            .recovery_date
            .is_some_and(|recovered| recovered < model.date_of_diagnosis)
        {
            return Err(ApiError::field(
                "recovery_date",
                "Recovery date cannot be before the date of diagnosis.",
            ));
        }
        check_unique(store, model, existing)
    }

    fn to_representation(
        model: &Illness,
        store: &EntityStore,
        ctx: &SerializerContext,
    ) -> ApiResult<Value> {
        let mut map = represent(model, ctx)?;
        insert_pet(&mut map, store, model.pet)?;
        insert_vet(&mut map, store, model.vet)?;
        Ok(Value::Object(map))
    }
}

/// Treatments hang off an illness rather than a pet
pub struct TreatmentSerializer;

impl ValidatableEntity for TreatmentSerializer {
    fn validation_config(operation: Operation) -> EntityValidationConfig {
        let mut config = EntityValidationConfig::new(EntityKind::Treatment, operation);
        text_field(&mut config, "name", Presence::Required, 100);
        free_text(&mut config, "description");
        date_field(&mut config, "start_date", Presence::Required);
        date_field(&mut config, "end_date", Presence::Optional);
        config.relation("illness", Presence::Optional);
        config.relation("vet", Presence::Optional);
        config
    }
}

impl Serializer for TreatmentSerializer {
    type Model = Treatment;

    fn build(
        payload: &Payload,
        existing: Option<&Treatment>,
        store: &EntityStore,
        _ctx: &SerializerContext,
    ) -> ApiResult<Treatment> {
        Ok(Treatment {
            id: existing.map(|e| e.id).unwrap_or_default(),
            illness: payload.relation::<Illness>(store, "illness", existing.map(|e| e.illness))?,
            vet: payload.relation::<Vet>(store, "vet", existing.map(|e| e.vet))?,
            name: payload.required("name", existing.map(|e| e.name.clone()))?,
            description: payload
                .required("description", existing.map(|e| e.description.clone()))?,
            start_date: payload.required("start_date", existing.map(|e| e.start_date))?,
            end_date: payload.optional("end_date", existing.map(|e| e.end_date))?,
        })
    }

    fn validate(
        model: &Treatment,
        existing: Option<&Treatment>,
        store: &EntityStore,
    ) -> ApiResult<()> {
        if model.end_date.is_some_and(|end| end < model.start_date) {
            return Err(ApiError::field(
                "end_date",
                "End date cannot be before the start date.",
            ));
        }
        check_unique(store, model, existing)
    }

    fn to_representation(
        model: &Treatment,
        store: &EntityStore,
        ctx: &SerializerContext,
    ) -> ApiResult<Value> {
        let mut map = represent(model, ctx)?;
        let illness = ref_value::<Illness>(store, model.illness)?;
        map.insert(
            "illness_name".to_string(),
            illness.get("name").cloned().unwrap_or(Value::Null),
        );
        map.insert("illness".to_string(), illness);
        insert_vet(&mut map, store, model.vet)?;
        Ok(Value::Object(map))
    }
}

//! Vet clinic and vet serializers

use super::{Payload, Serializer, SerializerContext, redact, represent, text_field};
use crate::core::entity::{EntityId, EntityKind};
use crate::core::error::ApiResult;
use crate::core::field::Gender;
use crate::core::validation::validators::in_list;
use crate::core::validation::{EntityValidationConfig, Operation, Presence, ValidatableEntity};
use crate::entities::{Vet, VetClinic};
use crate::storage::EntityStore;
use serde_json::{Value, json};

pub struct VetClinicSerializer;

impl ValidatableEntity for VetClinicSerializer {
    fn validation_config(operation: Operation) -> EntityValidationConfig {
        let mut config = EntityValidationConfig::new(EntityKind::VetClinic, operation);
        text_field(&mut config, "name", Presence::Required, 250);
        text_field(&mut config, "address", Presence::Required, 255);
        text_field(&mut config, "email", Presence::Required, 250);
        text_field(&mut config, "phone", Presence::Required, 15);
        config
    }
}

impl Serializer for VetClinicSerializer {
    type Model = VetClinic;

    fn build(
        payload: &Payload,
        existing: Option<&VetClinic>,
        _store: &EntityStore,
        _ctx: &SerializerContext,
    ) -> ApiResult<VetClinic> {
        Ok(VetClinic {
            id: existing.map(|e| e.id).unwrap_or_default(),
            name: payload.required("name", existing.map(|e| e.name.clone()))?,
            address: payload.required("address", existing.map(|e| e.address.clone()))?,
            email: payload.required("email", existing.map(|e| e.email.clone()))?,
            phone: payload.required("phone", existing.map(|e| e.phone.clone()))?,
        })
    }

    fn to_representation(
        model: &VetClinic,
        _store: &EntityStore,
        ctx: &SerializerContext,
    ) -> ApiResult<Value> {
        Ok(Value::Object(represent(model, ctx)?))
    }
}

/// Vets expose their clinic's address next to its name.
/// Gender, email and phone need elevated access.
pub struct VetSerializer;

impl ValidatableEntity for VetSerializer {
    fn validation_config(operation: Operation) -> EntityValidationConfig {
        let mut config = EntityValidationConfig::new(EntityKind::Vet, operation);
        text_field(&mut config, "name", Presence::Required, 250);
        config
            .scalar("gender", Presence::Required)
            .check(in_list(Gender::CHOICES));
        text_field(&mut config, "email", Presence::Required, 250);
        text_field(&mut config, "phone", Presence::Required, 15);
        config.relation("vet_clinic", Presence::Optional);
        config
    }
}

impl Serializer for VetSerializer {
    type Model = Vet;

    fn build(
        payload: &Payload,
        existing: Option<&Vet>,
        store: &EntityStore,
        _ctx: &SerializerContext,
    ) -> ApiResult<Vet> {
        Ok(Vet {
            id: existing.map(|e| e.id).unwrap_or_default(),
            vet_clinic: payload.relation::<VetClinic>(
                store,
                "vet_clinic",
                existing.map(|e| e.vet_clinic),
            )?,
            name: payload.required("name", existing.map(|e| e.name.clone()))?,
            gender: payload.required("gender", existing.map(|e| e.gender))?,
            email: payload.required("email", existing.map(|e| e.email.clone()))?,
            phone: payload.required("phone", existing.map(|e| e.phone.clone()))?,
        })
    }

    fn to_representation(
        model: &Vet,
        store: &EntityStore,
        ctx: &SerializerContext,
    ) -> ApiResult<Value> {
        let mut map = represent(model, ctx)?;
        map.insert("vet_clinic".to_string(), clinic_value(store, model.vet_clinic)?);
        redact(&mut map, ctx);
        Ok(Value::Object(map))
    }
}

fn clinic_value(store: &EntityStore, id: Option<EntityId>) -> ApiResult<Value> {
    let Some(id) = id else {
        return Ok(Value::Null);
    };
    Ok(store
        .get::<VetClinic>(id)?
        .map(|clinic| json!({ "id": clinic.id, "name": clinic.name, "address": clinic.address }))
        .unwrap_or(Value::Null))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serializers::testing::create;

    fn clinic(store: &EntityStore, name: &str) -> VetClinic {
        create::<VetClinicSerializer>(
            store,
            json!({
                "name": name,
                "address": "1 Main St",
                "email": "desk@clinic.test",
                "phone": "555-0100"
            }),
        )
        .unwrap()
    }

    fn vet_body(clinic: Option<i64>) -> Value {
        json!({
            "name": "Dr. Smith",
            "gender": "NB",
            "email": "smith@clinic.test",
            "phone": "555-0101",
            "vet_clinic_id": clinic
        })
    }

    #[test]
    fn test_clinic_unique_on_name_and_address() {
        let store = EntityStore::new();
        clinic(&store, "Happy Paws");
        let err = create::<VetClinicSerializer>(
            &store,
            json!({
                "name": "HAPPY PAWS",
                "address": "1 main st",
                "email": "other@clinic.test",
                "phone": "555"
            }),
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "A vet clinic with the same name and address already exists."
        );
    }

    #[test]
    fn test_phone_length_is_limited() {
        let store = EntityStore::new();
        let mut body = vet_body(None);
        body["phone"] = json!("+1 555 0101 2222 3");
        assert!(create::<VetSerializer>(&store, body).is_err());
    }

    #[test]
    fn test_vet_unique_per_clinic() {
        let store = EntityStore::new();
        let a = clinic(&store, "North");
        let b = clinic(&store, "South");
        create::<VetSerializer>(&store, vet_body(Some(a.id))).unwrap();
        assert!(create::<VetSerializer>(&store, vet_body(Some(a.id))).is_err());
        assert!(create::<VetSerializer>(&store, vet_body(Some(b.id))).is_ok());
    }

    #[test]
    fn test_vet_redaction() {
        let store = EntityStore::new();
        let north = clinic(&store, "North");
        let vet = create::<VetSerializer>(&store, vet_body(Some(north.id))).unwrap();

        let public = VetSerializer::to_representation(&vet, &store, &SerializerContext::default())
            .unwrap();
        for field in ["gender", "email", "phone"] {
            assert!(public.get(field).is_none(), "{} should be hidden", field);
        }
        assert_eq!(public["vet_clinic"]["address"], json!("1 Main St"));

        let staff = SerializerContext {
            show_sensitive_info: true,
            ..Default::default()
        };
        let full = VetSerializer::to_representation(&vet, &store, &staff).unwrap();
        assert_eq!(full["gender"], json!("NB"));
        assert_eq!(full["email"], json!("smith@clinic.test"));
        assert_eq!(full["phone"], json!("555-0101"));
    }
}

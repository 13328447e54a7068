//! Pet type and breed serializers

use super::{Payload, Serializer, SerializerContext, represent, ref_value};
use crate::core::entity::EntityKind;
use crate::core::error::ApiResult;
use crate::core::validation::filters::trim;
use crate::core::validation::validators::{alpha, max_length, text};
use crate::core::validation::{EntityValidationConfig, Operation, Presence, ValidatableEntity};
use crate::entities::{Breed, PetType};
use crate::storage::EntityStore;
use serde_json::Value;

pub struct PetTypeSerializer;

impl ValidatableEntity for PetTypeSerializer {
    fn validation_config(operation: Operation) -> EntityValidationConfig {
        let mut config = EntityValidationConfig::new(EntityKind::PetType, operation);
        config
            .scalar("name", Presence::Required)
            .filter(trim())
            .check(text())
            .check(alpha())
            .check(max_length(100));
        config
    }
}

impl Serializer for PetTypeSerializer {
    type Model = PetType;

    fn build(
        payload: &Payload,
        existing: Option<&PetType>,
        _store: &EntityStore,
        _ctx: &SerializerContext,
    ) -> ApiResult<PetType> {
        Ok(PetType {
            id: existing.map(|e| e.id).unwrap_or_default(),
            name: payload.required("name", existing.map(|e| e.name.clone()))?,
        })
    }

    fn to_representation(
        model: &PetType,
        _store: &EntityStore,
        ctx: &SerializerContext,
    ) -> ApiResult<Value> {
        Ok(Value::Object(represent(model, ctx)?))
    }
}

pub struct BreedSerializer;

impl ValidatableEntity for BreedSerializer {
    fn validation_config(operation: Operation) -> EntityValidationConfig {
        let mut config = EntityValidationConfig::new(EntityKind::Breed, operation);
        config
            .scalar("name", Presence::Required)
            .filter(trim())
            .check(text())
            .check(alpha())
            .check(max_length(200));
        config.relation("pet_type", Presence::Optional);
        config
    }
}

impl Serializer for BreedSerializer {
    type Model = Breed;

    fn build(
        payload: &Payload,
        existing: Option<&Breed>,
        store: &EntityStore,
        _ctx: &SerializerContext,
    ) -> ApiResult<Breed> {
        Ok(Breed {
            id: existing.map(|e| e.id).unwrap_or_default(),
            pet_type: payload.relation::<PetType>(
                store,
                "pet_type",
                existing.map(|e| e.pet_type),
            )?,
            name: payload.required("name", existing.map(|e| e.name.clone()))?,
        })
    }

    fn to_representation(
        model: &Breed,
        store: &EntityStore,
        ctx: &SerializerContext,
    ) -> ApiResult<Value> {
        let mut map = represent(model, ctx)?;
        map.insert(
            "pet_type".to_string(),
            ref_value::<PetType>(store, model.pet_type)?,
        );
        Ok(Value::Object(map))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entity::Entity;
    use crate::serializers::testing::{create, update};
    use serde_json::json;

    #[test]
    fn test_pet_type_name_must_be_alphabetic() {
        let store = EntityStore::new();
        let err = create::<PetTypeSerializer>(&store, json!({ "name": "Dog2" })).unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
        assert!(create::<PetTypeSerializer>(&store, json!({ "name": " Guinea Pig " })).is_ok());
    }

    #[test]
    fn test_pet_type_duplicate_ignores_case() {
        let store = EntityStore::new();
        create::<PetTypeSerializer>(&store, json!({ "name": "Dog" })).unwrap();
        let err = create::<PetTypeSerializer>(&store, json!({ "name": "DOG" })).unwrap_err();
        assert_eq!(err.to_string(), "A pet type with this name already exists.");
    }

    #[test]
    fn test_breed_unique_per_pet_type() {
        let store = EntityStore::new();
        let dog = create::<PetTypeSerializer>(&store, json!({ "name": "Dog" })).unwrap();
        let cat = create::<PetTypeSerializer>(&store, json!({ "name": "Cat" })).unwrap();

        create::<BreedSerializer>(&store, json!({ "name": "Mixed", "pet_type_id": dog.id })).unwrap();
        let err = create::<BreedSerializer>(&store, json!({ "name": "mixed", "pet_type_id": dog.id }))
            .unwrap_err();
        assert_eq!(err.error_code(), "DUPLICATE_RECORD");
        assert!(
            create::<BreedSerializer>(&store, json!({ "name": "Mixed", "pet_type_id": cat.id }))
                .is_ok()
        );
    }

    #[test]
    fn test_breed_update_moves_pet_type() {
        let store = EntityStore::new();
        let dog = create::<PetTypeSerializer>(&store, json!({ "name": "Dog" })).unwrap();
        let cat = create::<PetTypeSerializer>(&store, json!({ "name": "Cat" })).unwrap();
        let breed =
            create::<BreedSerializer>(&store, json!({ "name": "Sphynx", "pet_type_id": dog.id }))
                .unwrap();

        update::<BreedSerializer>(&store, &breed, Operation::Update, json!({ "pet_type_id": cat.id }))
            .unwrap();

        let stored = store.get::<Breed>(breed.id()).unwrap().unwrap();
        assert_eq!(stored.pet_type, Some(cat.id));
        assert_eq!(store.count(EntityKind::Breed).unwrap(), 1);
    }

    #[test]
    fn test_breed_representation_expands_pet_type() {
        let store = EntityStore::new();
        let dog = create::<PetTypeSerializer>(&store, json!({ "name": "Dog" })).unwrap();
        let breed =
            create::<BreedSerializer>(&store, json!({ "name": "Beagle", "pet_type_id": dog.id }))
                .unwrap();
        let value =
            BreedSerializer::to_representation(&breed, &store, &SerializerContext::default())
                .unwrap();
        assert_eq!(value["pet_type"], json!({ "id": dog.id, "name": "Dog" }));
        assert_eq!(value["url"], json!(format!("/breeds/{}/", breed.id)));
    }
}

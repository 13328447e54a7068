//! Pet and owner serializers

use super::{Payload, Serializer, SerializerContext, represent, ref_value};
use crate::core::entity::EntityKind;
use crate::core::error::{ApiResult, RequestError};
use crate::core::field::{OwnerType, Sex};
use crate::core::validation::filters::trim;
use crate::core::validation::validators::{alpha, date, in_list, max_length, text};
use crate::core::validation::{EntityValidationConfig, Operation, Presence, ValidatableEntity};
use crate::entities::{Breed, Owner, Pet, PetType};
use crate::storage::EntityStore;
use serde_json::Value;

pub struct PetSerializer;

impl ValidatableEntity for PetSerializer {
    fn validation_config(operation: Operation) -> EntityValidationConfig {
        let mut config = EntityValidationConfig::new(EntityKind::Pet, operation);
        config
            .scalar("name", Presence::Required)
            .filter(trim())
            .check(text())
            .check(max_length(200));
        config
            .scalar("sex", Presence::Required)
            .check(in_list(Sex::CHOICES));
        config.scalar("birthdate", Presence::Required).check(date());
        config
            .scalar("color", Presence::Required)
            .filter(trim())
            .check(text())
            .check(alpha())
            .check(max_length(100));
        config.relation("pet_type", Presence::Optional);
        config.relation("breed", Presence::Optional);
        config
    }
}

impl Serializer for PetSerializer {
    type Model = Pet;

    fn build(
        payload: &Payload,
        existing: Option<&Pet>,
        store: &EntityStore,
        _ctx: &SerializerContext,
    ) -> ApiResult<Pet> {
        Ok(Pet {
            id: existing.map(|e| e.id).unwrap_or_default(),
            pet_type: payload.relation::<PetType>(store, "pet_type", existing.map(|e| e.pet_type))?,
            breed: payload.relation::<Breed>(store, "breed", existing.map(|e| e.breed))?,
            name: payload.required("name", existing.map(|e| e.name.clone()))?,
            sex: payload.required("sex", existing.map(|e| e.sex))?,
            birthdate: payload.required("birthdate", existing.map(|e| e.birthdate))?,
            color: payload.required("color", existing.map(|e| e.color.clone()))?,
        })
    }

    fn to_representation(
        model: &Pet,
        store: &EntityStore,
        ctx: &SerializerContext,
    ) -> ApiResult<Value> {
        let mut map = represent(model, ctx)?;
        map.insert(
            "pet_type".to_string(),
            ref_value::<PetType>(store, model.pet_type)?,
        );
        map.insert("breed".to_string(), ref_value::<Breed>(store, model.breed)?);
        Ok(Value::Object(map))
    }
}

/// Owners link the current user to a pet.
///
/// The user is never read from the payload: it is the authenticated user
/// on create and stays unchanged on update.
pub struct OwnerSerializer;

impl ValidatableEntity for OwnerSerializer {
    fn validation_config(operation: Operation) -> EntityValidationConfig {
        let mut config = EntityValidationConfig::new(EntityKind::Owner, operation);
        config
            .scalar("owner_type", Presence::Optional)
            .check(in_list(OwnerType::CHOICES));
        config.relation("pet", Presence::Required);
        config
    }
}

impl Serializer for OwnerSerializer {
    type Model = Owner;

    fn build(
        payload: &Payload,
        existing: Option<&Owner>,
        store: &EntityStore,
        ctx: &SerializerContext,
    ) -> ApiResult<Owner> {
        let user = match existing {
            Some(owner) => owner.user,
            None => ctx.current_user.ok_or_else(|| RequestError::Unauthorized {
                message: "an authenticated user is required to register a pet owner".to_string(),
            })?,
        };

        Ok(Owner {
            id: existing.map(|e| e.id).unwrap_or_default(),
            pet: payload.required_relation::<Pet>(store, "pet", existing.map(|e| e.pet))?,
            user,
            owner_type: payload
                .optional("owner_type", existing.map(|e| Some(e.owner_type)))?
                .unwrap_or_default(),
        })
    }

    fn to_representation(
        model: &Owner,
        store: &EntityStore,
        ctx: &SerializerContext,
    ) -> ApiResult<Value> {
        let mut map = represent(model, ctx)?;
        map.remove("user");
        map.insert("user_id".to_string(), Value::String(model.user.to_string()));
        map.insert("pet".to_string(), ref_value::<Pet>(store, Some(model.pet))?);
        Ok(Value::Object(map))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serializers::testing::{create, create_as, update};
    use serde_json::json;
    use uuid::Uuid;

    fn rex() -> Value {
        json!({
            "name": "Rex",
            "sex": "M",
            "birthdate": "2020-04-01",
            "color": "Golden Brown"
        })
    }

    #[test]
    fn test_pet_color_must_be_alphabetic() {
        let store = EntityStore::new();
        let mut body = rex();
        body["color"] = json!("Black & White");
        let err = create::<PetSerializer>(&store, body).unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_pet_rejects_unknown_sex_and_bad_date() {
        let store = EntityStore::new();
        let mut body = rex();
        body["sex"] = json!("X");
        body["birthdate"] = json!("01/04/2020");
        let err = create::<PetSerializer>(&store, body).unwrap_err();
        let details = err.to_response().details.unwrap();
        assert_eq!(details["fields"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_pets_may_share_a_name() {
        let store = EntityStore::new();
        create::<PetSerializer>(&store, rex()).unwrap();
        assert!(create::<PetSerializer>(&store, rex()).is_ok());
    }

    #[test]
    fn test_pet_partial_update_keeps_references() {
        let store = EntityStore::new();
        let dog = store.insert(PetType { id: 0, name: "Dog".into() }).unwrap();
        let mut body = rex();
        body["pet_type_id"] = json!(dog.id);
        let pet = create::<PetSerializer>(&store, body).unwrap();

        let renamed =
            update::<PetSerializer>(&store, &pet, Operation::PartialUpdate, json!({ "name": "Max" }))
                .unwrap();
        assert_eq!(renamed.name, "Max");
        assert_eq!(renamed.pet_type, Some(dog.id));

        let err = update::<PetSerializer>(&store, &pet, Operation::Update, json!({ "name": "Max" }))
            .unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_owner_requires_current_user() {
        let store = EntityStore::new();
        let pet = create::<PetSerializer>(&store, rex()).unwrap();

        let err = create::<OwnerSerializer>(&store, json!({ "pet_id": pet.id })).unwrap_err();
        assert_eq!(err.error_code(), "UNAUTHORIZED");

        let user = Uuid::new_v4();
        let ctx = SerializerContext {
            current_user: Some(user),
            ..Default::default()
        };
        let owner = create_as::<OwnerSerializer>(&store, json!({ "pet_id": pet.id }), &ctx).unwrap();
        assert_eq!(owner.user, user);
        assert_eq!(owner.owner_type, OwnerType::Primary);

        let value = OwnerSerializer::to_representation(&owner, &store, &ctx).unwrap();
        assert_eq!(value["user_id"], json!(user.to_string()));
        assert_eq!(value["owner_type"], json!("P"));
        assert_eq!(value["pet"]["name"], json!("Rex"));
        assert!(value.get("user").is_none());
    }

    #[test]
    fn test_owner_type_accepts_long_names() {
        let store = EntityStore::new();
        let pet = create::<PetSerializer>(&store, rex()).unwrap();
        let ctx = SerializerContext {
            current_user: Some(Uuid::new_v4()),
            ..Default::default()
        };
        let owner = create_as::<OwnerSerializer>(
            &store,
            json!({ "pet_id": pet.id, "owner_type": "Secondary" }),
            &ctx,
        )
        .unwrap();
        assert_eq!(owner.owner_type, OwnerType::Secondary);
    }
}

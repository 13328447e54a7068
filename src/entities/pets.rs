//! Pets and their owners

use crate::core::field::{OwnerType, Sex};
use crate::{impl_named, impl_record};
use chrono::NaiveDate;
use uuid::Uuid;

impl_record!(
    Pet, pets,
    fields: {
        name: String,
        sex: Sex,
        birthdate: NaiveDate,
        color: String,
    },
    belongs_to: {},
    references: {
        pet_type: PetType => SetNull,
        breed: Breed => SetNull,
    },
);

impl_record!(
    Owner, pet_owners,
    fields: {
        /// Opaque id of the user supplied by the auth layer
        user: Uuid,
        owner_type: OwnerType,
    },
    belongs_to: { pet: Pet },
    references: {},
);

impl_named!(Pet);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entity::{Entity, OnDelete};

    #[test]
    fn test_pet_has_no_uniqueness_constraint() {
        let pet = Pet {
            id: 1,
            pet_type: None,
            breed: None,
            name: "Rex".into(),
            sex: Sex::Male,
            birthdate: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            color: "Brown".into(),
        };
        assert_eq!(pet.unique_key(), None);
        assert!(Pet::relations().iter().all(|r| r.on_delete == OnDelete::SetNull));
    }

    #[test]
    fn test_owner_belongs_to_pet() {
        let owner = Owner {
            id: 1,
            pet: 4,
            user: Uuid::new_v4(),
            owner_type: OwnerType::Primary,
        };
        assert_eq!(owner.foreign_key("pet"), Some(4));
        let relation = Owner::relations()[0];
        assert!(relation.required);
        assert_eq!(relation.on_delete, OnDelete::Cascade);
    }
}

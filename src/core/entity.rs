//! Entity traits defining the core abstraction for all record types

use crate::storage::table::{Table, Tables};
use serde::Serialize;
use std::fmt;

/// Primary key of every stored record.
pub type EntityId = i64;

/// Components of a uniqueness constraint.
///
/// A `None` component is a NULL column: the storage-level index skips keys
/// containing one, the serializer-level duplicate check compares it as a value.
pub type UniqueKey = Vec<Option<String>>;

/// Every entity type known to the system.
///
/// This is the static registry of record types: resource paths, display
/// labels and the pet-scoped sub-resources are all declared here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    PetType,
    Breed,
    Pet,
    Owner,
    VetClinic,
    Vet,
    Allergy,
    WeighIn,
    Surgery,
    Procedure,
    VetVisit,
    Vaccine,
    Illness,
    Treatment,
    PetSalon,
    PetGroomer,
    GroomingAppointment,
}

impl EntityKind {
    pub const ALL: [EntityKind; 17] = [
        EntityKind::PetType,
        EntityKind::Breed,
        EntityKind::Pet,
        EntityKind::Owner,
        EntityKind::VetClinic,
        EntityKind::Vet,
        EntityKind::Allergy,
        EntityKind::WeighIn,
        EntityKind::Surgery,
        EntityKind::Procedure,
        EntityKind::VetVisit,
        EntityKind::Vaccine,
        EntityKind::Illness,
        EntityKind::Treatment,
        EntityKind::PetSalon,
        EntityKind::PetGroomer,
        EntityKind::GroomingAppointment,
    ];

    /// The singular resource name (e.g., "pet_type")
    pub fn singular(self) -> &'static str {
        match self {
            EntityKind::PetType => "pet_type",
            EntityKind::Breed => "breed",
            EntityKind::Pet => "pet",
            EntityKind::Owner => "pet_owner",
            EntityKind::VetClinic => "vet_clinic",
            EntityKind::Vet => "vet",
            EntityKind::Allergy => "allergy",
            EntityKind::WeighIn => "weigh_in",
            EntityKind::Surgery => "surgery",
            EntityKind::Procedure => "procedure",
            EntityKind::VetVisit => "vet_visit",
            EntityKind::Vaccine => "vaccine",
            EntityKind::Illness => "illness",
            EntityKind::Treatment => "treatment",
            EntityKind::PetSalon => "pet_salon",
            EntityKind::PetGroomer => "pet_groomer",
            EntityKind::GroomingAppointment => "grooming_appointment",
        }
    }

    /// The plural resource name used in URLs (e.g., "pet_types")
    pub fn plural(self) -> &'static str {
        match self {
            EntityKind::PetType => "pet_types",
            EntityKind::Breed => "breeds",
            EntityKind::Pet => "pets",
            EntityKind::Owner => "pet_owners",
            EntityKind::VetClinic => "vet_clinics",
            EntityKind::Vet => "vets",
            EntityKind::Allergy => "allergies",
            EntityKind::WeighIn => "weigh_ins",
            EntityKind::Surgery => "surgeries",
            EntityKind::Procedure => "procedures",
            EntityKind::VetVisit => "vet_visits",
            EntityKind::Vaccine => "vaccines",
            EntityKind::Illness => "illnesses",
            EntityKind::Treatment => "treatments",
            EntityKind::PetSalon => "pet_salons",
            EntityKind::PetGroomer => "pet_groomers",
            EntityKind::GroomingAppointment => "grooming_appointments",
        }
    }

    /// Human-readable label used in error messages
    pub fn label(self) -> &'static str {
        match self {
            EntityKind::PetType => "Pet type",
            EntityKind::Breed => "Breed",
            EntityKind::Pet => "Pet",
            EntityKind::Owner => "Pet owner",
            EntityKind::VetClinic => "Vet clinic",
            EntityKind::Vet => "Vet",
            EntityKind::Allergy => "Allergy",
            EntityKind::WeighIn => "Weigh-in",
            EntityKind::Surgery => "Surgery",
            EntityKind::Procedure => "Procedure",
            EntityKind::VetVisit => "Vet visit",
            EntityKind::Vaccine => "Vaccine",
            EntityKind::Illness => "Illness",
            EntityKind::Treatment => "Treatment",
            EntityKind::PetSalon => "Pet salon",
            EntityKind::PetGroomer => "Pet groomer",
            EntityKind::GroomingAppointment => "Grooming appointment",
        }
    }

    /// Whether this record type is also served under `/pets/{pet_id}/...`
    pub fn is_pet_scoped(self) -> bool {
        matches!(
            self,
            EntityKind::Allergy
                | EntityKind::WeighIn
                | EntityKind::Surgery
                | EntityKind::Procedure
                | EntityKind::VetVisit
                | EntityKind::Vaccine
                | EntityKind::Illness
                | EntityKind::GroomingAppointment
        )
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What happens to a dependent row when the row it references is deleted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnDelete {
    /// Delete the dependent row too
    Cascade,
    /// Clear the dependent's reference and keep it
    SetNull,
}

/// A foreign key declared by an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relation {
    /// Field name on the declaring entity (e.g., "pet")
    pub field: &'static str,
    /// The referenced entity type
    pub target: EntityKind,
    /// Delete policy applied when the target row is removed
    pub on_delete: OnDelete,
    /// Whether the reference can never be NULL
    pub required: bool,
}

/// Base trait for all entities in the system.
///
/// Implementations are generated by [`impl_record!`](crate::impl_record):
/// the macro declares the struct, its foreign keys with their delete
/// policies, and its uniqueness constraint.
pub trait Entity: Clone + fmt::Debug + Send + Sync + 'static {
    /// The entity type this struct stores
    const KIND: EntityKind;

    /// The plural resource name used in URLs (e.g., "pet_types")
    fn resource_name() -> &'static str {
        Self::KIND.plural()
    }

    /// The singular resource name (e.g., "pet_type")
    fn resource_name_singular() -> &'static str {
        Self::KIND.singular()
    }

    /// Get the primary key of this record
    fn id(&self) -> EntityId;

    /// Assign the primary key (used by the store on insert)
    fn set_id(&mut self, id: EntityId);

    /// Foreign keys declared by this entity type
    fn relations() -> &'static [Relation];

    /// Current value of the foreign key named `field`
    fn foreign_key(&self, field: &str) -> Option<EntityId>;

    /// Clear an optional foreign key. Required keys are left untouched.
    fn clear_foreign_key(&mut self, field: &str);

    /// Uniqueness constraint of this record, if the type declares one
    fn unique_key(&self) -> Option<UniqueKey>;

    /// Message reported when the uniqueness constraint is violated
    fn duplicate_message() -> &'static str;

    /// The table holding rows of this type
    fn table(tables: &Tables) -> &Table<Self>;

    /// Mutable access to the table holding rows of this type
    fn table_mut(tables: &mut Tables) -> &mut Table<Self>;
}

/// Entities that other records refer to by display name
pub trait Named: Entity {
    fn name(&self) -> &str;
}

/// Conversion of a field into one component of a [`UniqueKey`]
pub trait KeyPart {
    fn key_part(&self) -> Option<String>;
}

impl KeyPart for String {
    fn key_part(&self) -> Option<String> {
        Some(self.clone())
    }
}

impl KeyPart for i64 {
    fn key_part(&self) -> Option<String> {
        Some(self.to_string())
    }
}

impl KeyPart for chrono::NaiveDate {
    fn key_part(&self) -> Option<String> {
        Some(self.format("%Y-%m-%d").to_string())
    }
}

impl KeyPart for chrono::DateTime<chrono::Utc> {
    fn key_part(&self) -> Option<String> {
        Some(self.to_rfc3339())
    }
}

impl<T: KeyPart> KeyPart for Option<T> {
    fn key_part(&self) -> Option<String> {
        self.as_ref().and_then(KeyPart::key_part)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_kind_names() {
        assert_eq!(EntityKind::PetType.plural(), "pet_types");
        assert_eq!(EntityKind::Owner.plural(), "pet_owners");
        assert_eq!(EntityKind::Illness.plural(), "illnesses");
        assert_eq!(EntityKind::WeighIn.singular(), "weigh_in");
    }

    #[test]
    fn test_plural_names_are_unique() {
        let mut names: Vec<_> = EntityKind::ALL.iter().map(|k| k.plural()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), EntityKind::ALL.len());
    }

    #[test]
    fn test_pet_scoped_kinds() {
        let scoped: Vec<_> = EntityKind::ALL
            .iter()
            .filter(|k| k.is_pet_scoped())
            .collect();
        assert_eq!(scoped.len(), 8);
        assert!(!EntityKind::Treatment.is_pet_scoped());
        assert!(!EntityKind::Owner.is_pet_scoped());
    }

    #[test]
    fn test_key_parts() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(date.key_part(), Some("2024-03-09".to_string()));
        assert_eq!(Some(7_i64).key_part(), Some("7".to_string()));
        assert_eq!(None::<i64>.key_part(), None);
    }
}

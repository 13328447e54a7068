//! Per-entity tables with a primary key sequence and a unique index

use crate::core::entity::{Entity, EntityId, EntityKind, Relation, UniqueKey};
use crate::entities::{
    Allergy, Breed, GroomingAppointment, Illness, Owner, Pet, PetGroomer, PetSalon, PetType,
    Procedure, Surgery, Treatment, Vaccine, Vet, VetClinic, VetVisit, WeighIn,
};
use crate::storage::StorageError;
use std::collections::{BTreeMap, HashMap};

/// Rows of one entity type, ordered by primary key
#[derive(Debug, Clone)]
pub struct Table<T> {
    rows: BTreeMap<EntityId, T>,
    unique: HashMap<Vec<String>, EntityId>,
    next_id: EntityId,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            unique: HashMap::new(),
            next_id: 1,
        }
    }
}

/// Index key of a row, or `None` when a component is NULL
fn index_key(key: Option<UniqueKey>) -> Option<Vec<String>> {
    key?.into_iter().collect()
}

impl<T: Entity> Table<T> {
    pub fn get(&self, id: EntityId) -> Option<&T> {
        self.rows.get(&id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.rows.contains_key(&id)
    }

    pub fn rows(&self) -> impl Iterator<Item = &T> {
        self.rows.values()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn check_index(&self, key: &Option<Vec<String>>, exclude: Option<EntityId>) -> Result<(), StorageError> {
        let Some(key) = key else {
            return Ok(());
        };
        match self.unique.get(key) {
            Some(owner) if Some(*owner) != exclude => Err(StorageError::UniqueViolation {
                kind: T::KIND,
                message: T::duplicate_message(),
            }),
            _ => Ok(()),
        }
    }

    /// Insert a new row, assigning the next primary key
    pub(crate) fn insert(&mut self, mut row: T) -> Result<T, StorageError> {
        let key = index_key(row.unique_key());
        self.check_index(&key, None)?;

        let id = self.next_id;
        self.next_id += 1;
        row.set_id(id);

        if let Some(key) = key {
            self.unique.insert(key, id);
        }
        self.rows.insert(id, row.clone());
        Ok(row)
    }

    /// Replace an existing row, keeping its primary key
    pub(crate) fn replace(&mut self, row: T) -> Result<T, StorageError> {
        let id = row.id();
        let Some(previous) = self.rows.get(&id) else {
            return Err(StorageError::NotFound { kind: T::KIND, id });
        };

        let old_key = index_key(previous.unique_key());
        let new_key = index_key(row.unique_key());
        self.check_index(&new_key, Some(id))?;

        if let Some(old_key) = old_key {
            self.unique.remove(&old_key);
        }
        if let Some(new_key) = new_key {
            self.unique.insert(new_key, id);
        }
        self.rows.insert(id, row.clone());
        Ok(row)
    }

    fn take(&mut self, id: EntityId) -> Option<T> {
        let row = self.rows.remove(&id)?;
        if let Some(key) = index_key(row.unique_key()) {
            if self.unique.get(&key) == Some(&id) {
                self.unique.remove(&key);
            }
        }
        Some(row)
    }
}

/// Type-erased table operations used by delete propagation
pub trait TableOps: Send + Sync {
    fn kind(&self) -> EntityKind;

    fn relations(&self) -> &'static [Relation];

    fn contains(&self, id: EntityId) -> bool;

    fn len(&self) -> usize;

    /// Ids of rows whose `field` points at `target`
    fn referencing(&self, field: &str, target: EntityId) -> Vec<EntityId>;

    /// Remove a row; returns false when it was already gone
    fn remove(&mut self, id: EntityId) -> bool;

    /// Set an optional foreign key to NULL
    fn clear_reference(&mut self, id: EntityId, field: &str);
}

impl<T: Entity> TableOps for Table<T> {
    fn kind(&self) -> EntityKind {
        T::KIND
    }

    fn relations(&self) -> &'static [Relation] {
        T::relations()
    }

    fn contains(&self, id: EntityId) -> bool {
        self.rows.contains_key(&id)
    }

    fn len(&self) -> usize {
        self.rows.len()
    }

    fn referencing(&self, field: &str, target: EntityId) -> Vec<EntityId> {
        self.rows
            .values()
            .filter(|row| row.foreign_key(field) == Some(target))
            .map(Entity::id)
            .collect()
    }

    fn remove(&mut self, id: EntityId) -> bool {
        self.take(id).is_some()
    }

    fn clear_reference(&mut self, id: EntityId, field: &str) {
        let Some(mut row) = self.take(id) else {
            return;
        };
        row.clear_foreign_key(field);
        if let Some(key) = index_key(row.unique_key()) {
            self.unique.entry(key).or_insert(id);
        }
        self.rows.insert(id, row);
    }
}

/// All tables of the store
#[derive(Debug, Clone, Default)]
pub struct Tables {
    pub pet_types: Table<PetType>,
    pub breeds: Table<Breed>,
    pub pets: Table<Pet>,
    pub pet_owners: Table<Owner>,
    pub vet_clinics: Table<VetClinic>,
    pub vets: Table<Vet>,
    pub allergies: Table<Allergy>,
    pub weigh_ins: Table<WeighIn>,
    pub surgeries: Table<Surgery>,
    pub procedures: Table<Procedure>,
    pub vet_visits: Table<VetVisit>,
    pub vaccines: Table<Vaccine>,
    pub illnesses: Table<Illness>,
    pub treatments: Table<Treatment>,
    pub pet_salons: Table<PetSalon>,
    pub pet_groomers: Table<PetGroomer>,
    pub grooming_appointments: Table<GroomingAppointment>,
}

impl Tables {
    pub fn ops(&self, kind: EntityKind) -> &dyn TableOps {
        match kind {
            EntityKind::PetType => &self.pet_types,
            EntityKind::Breed => &self.breeds,
            EntityKind::Pet => &self.pets,
            EntityKind::Owner => &self.pet_owners,
            EntityKind::VetClinic => &self.vet_clinics,
            EntityKind::Vet => &self.vets,
            EntityKind::Allergy => &self.allergies,
            EntityKind::WeighIn => &self.weigh_ins,
            EntityKind::Surgery => &self.surgeries,
            EntityKind::Procedure => &self.procedures,
            EntityKind::VetVisit => &self.vet_visits,
            EntityKind::Vaccine => &self.vaccines,
            EntityKind::Illness => &self.illnesses,
            EntityKind::Treatment => &self.treatments,
            EntityKind::PetSalon => &self.pet_salons,
            EntityKind::PetGroomer => &self.pet_groomers,
            EntityKind::GroomingAppointment => &self.grooming_appointments,
        }
    }

    pub fn ops_mut(&mut self, kind: EntityKind) -> &mut dyn TableOps {
        match kind {
            EntityKind::PetType => &mut self.pet_types,
            EntityKind::Breed => &mut self.breeds,
            EntityKind::Pet => &mut self.pets,
            EntityKind::Owner => &mut self.pet_owners,
            EntityKind::VetClinic => &mut self.vet_clinics,
            EntityKind::Vet => &mut self.vets,
            EntityKind::Allergy => &mut self.allergies,
            EntityKind::WeighIn => &mut self.weigh_ins,
            EntityKind::Surgery => &mut self.surgeries,
            EntityKind::Procedure => &mut self.procedures,
            EntityKind::VetVisit => &mut self.vet_visits,
            EntityKind::Vaccine => &mut self.vaccines,
            EntityKind::Illness => &mut self.illnesses,
            EntityKind::Treatment => &mut self.treatments,
            EntityKind::PetSalon => &mut self.pet_salons,
            EntityKind::PetGroomer => &mut self.pet_groomers,
            EntityKind::GroomingAppointment => &mut self.grooming_appointments,
        }
    }
}

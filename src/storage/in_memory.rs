//! In-memory relational store
//!
//! One table per record type behind a single `RwLock`. Writes re-check
//! foreign keys and the unique index inside the write lock, and deletes
//! apply each relation's `OnDelete` policy to dependent rows.

use crate::core::entity::{Entity, EntityId, EntityKind, OnDelete};
use crate::storage::StorageError;
use crate::storage::table::Tables;
use std::collections::VecDeque;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, error};

/// Thread-safe store holding every table
#[derive(Debug, Default)]
pub struct EntityStore {
    tables: RwLock<Tables>,
}

impl EntityStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, StorageError> {
        self.tables.read().map_err(|e| {
            error!(error = %e, "failed to acquire store read lock");
            StorageError::LockPoisoned
        })
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, StorageError> {
        self.tables.write().map_err(|e| {
            error!(error = %e, "failed to acquire store write lock");
            StorageError::LockPoisoned
        })
    }

    /// Fetch a row by primary key
    pub fn get<T: Entity>(&self, id: EntityId) -> Result<Option<T>, StorageError> {
        let tables = self.read()?;
        Ok(T::table(&tables).get(id).cloned())
    }

    /// Whether a row of `kind` with `id` exists
    pub fn exists(&self, kind: EntityKind, id: EntityId) -> Result<bool, StorageError> {
        let tables = self.read()?;
        Ok(tables.ops(kind).contains(id))
    }

    /// All rows of a type, ordered by primary key
    pub fn list<T: Entity>(&self) -> Result<Vec<T>, StorageError> {
        self.list_where(|_: &T| true)
    }

    /// Rows of a type matching `predicate`, ordered by primary key
    pub fn list_where<T, F>(&self, predicate: F) -> Result<Vec<T>, StorageError>
    where
        T: Entity,
        F: Fn(&T) -> bool,
    {
        let tables = self.read()?;
        Ok(T::table(&tables)
            .rows()
            .filter(|row| predicate(row))
            .cloned()
            .collect())
    }

    /// Insert a new row; its id is assigned by the table
    pub fn insert<T: Entity>(&self, row: T) -> Result<T, StorageError> {
        let mut tables = self.write()?;
        check_references(&tables, &row)?;
        T::table_mut(&mut tables).insert(row)
    }

    /// Replace the row with the same id
    pub fn update<T: Entity>(&self, row: T) -> Result<T, StorageError> {
        let mut tables = self.write()?;
        check_references(&tables, &row)?;
        T::table_mut(&mut tables).replace(row)
    }

    /// Delete a row and apply delete policies to its dependents.
    ///
    /// Returns every removed row, the requested one first.
    pub fn delete<T: Entity>(&self, id: EntityId) -> Result<Vec<(EntityKind, EntityId)>, StorageError> {
        let mut tables = self.write()?;
        if !T::table(&tables).contains(id) {
            return Err(StorageError::NotFound { kind: T::KIND, id });
        }

        let mut removed = Vec::new();
        let mut queue = VecDeque::from([(T::KIND, id)]);

        while let Some((kind, id)) = queue.pop_front() {
            if !tables.ops_mut(kind).remove(id) {
                continue;
            }
            removed.push((kind, id));

            for dependent in EntityKind::ALL {
                let relations = tables.ops(dependent).relations();
                for relation in relations.iter().filter(|r| r.target == kind) {
                    let rows = tables.ops(dependent).referencing(relation.field, id);
                    for row in rows {
                        match relation.on_delete {
                            OnDelete::Cascade => {
                                debug!(entity = %dependent, id = row, parent = %kind, "cascading delete");
                                queue.push_back((dependent, row));
                            }
                            OnDelete::SetNull => {
                                debug!(entity = %dependent, id = row, field = relation.field, "clearing reference");
                                tables.ops_mut(dependent).clear_reference(row, relation.field);
                            }
                        }
                    }
                }
            }
        }

        Ok(removed)
    }

    /// Find a row other than `exclude` with the same uniqueness key.
    ///
    /// Unlike the storage index, NULL components compare equal here.
    pub fn find_duplicate<T: Entity>(
        &self,
        row: &T,
        exclude: Option<EntityId>,
    ) -> Result<Option<EntityId>, StorageError> {
        let Some(key) = row.unique_key() else {
            return Ok(None);
        };
        let tables = self.read()?;
        Ok(T::table(&tables)
            .rows()
            .filter(|other| Some(other.id()) != exclude)
            .find(|other| other.unique_key().as_ref() == Some(&key))
            .map(Entity::id))
    }

    /// Fail with `UniqueViolation` when [`find_duplicate`](Self::find_duplicate) finds a match
    pub fn check_unique<T: Entity>(&self, row: &T, exclude: Option<EntityId>) -> Result<(), StorageError> {
        match self.find_duplicate(row, exclude)? {
            Some(_) => Err(StorageError::UniqueViolation {
                kind: T::KIND,
                message: T::duplicate_message(),
            }),
            None => Ok(()),
        }
    }

    /// Number of rows of `kind`
    pub fn count(&self, kind: EntityKind) -> Result<usize, StorageError> {
        let tables = self.read()?;
        Ok(tables.ops(kind).len())
    }
}

fn check_references<T: Entity>(tables: &Tables, row: &T) -> Result<(), StorageError> {
    for relation in T::relations() {
        if let Some(id) = row.foreign_key(relation.field) {
            if !tables.ops(relation.target).contains(id) {
                return Err(StorageError::ForeignKeyViolation {
                    field: relation.field,
                    target: relation.target,
                    id,
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::field::{Gender, Sex};
    use crate::entities::{Breed, Pet, PetType, Surgery, Vet};
    use chrono::NaiveDate;

    fn pet(name: &str) -> Pet {
        Pet {
            id: 0,
            pet_type: None,
            breed: None,
            name: name.to_string(),
            sex: Sex::Female,
            birthdate: NaiveDate::from_ymd_opt(2021, 6, 1).unwrap(),
            color: "Black".to_string(),
        }
    }

    fn vet(name: &str) -> Vet {
        Vet {
            id: 0,
            vet_clinic: None,
            name: name.to_string(),
            gender: Gender::Female,
            email: "vet@example.com".to_string(),
            phone: "555".to_string(),
        }
    }

    fn surgery(pet: EntityId, vet: Option<EntityId>) -> Surgery {
        Surgery {
            id: 0,
            pet,
            vet,
            date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            name: "Spay".to_string(),
            description: "Routine".to_string(),
        }
    }

    #[test]
    fn test_ids_start_at_one_and_are_not_reused() {
        let store = EntityStore::new();
        let first = store.insert(pet("Rex")).unwrap();
        let second = store.insert(pet("Fido")).unwrap();
        assert_eq!((first.id, second.id), (1, 2));

        store.delete::<Pet>(second.id).unwrap();
        let third = store.insert(pet("Luna")).unwrap();
        assert_eq!(third.id, 3);
    }

    #[test]
    fn test_unique_index_rejects_case_insensitive_duplicate() {
        let store = EntityStore::new();
        store.insert(PetType { id: 0, name: "Dog".into() }).unwrap();
        let err = store.insert(PetType { id: 0, name: "dog".into() }).unwrap_err();
        assert!(matches!(err, StorageError::UniqueViolation { kind: EntityKind::PetType, .. }));
        assert_eq!(err.to_string(), "A pet type with this name already exists.");
    }

    #[test]
    fn test_index_skips_null_components_but_precheck_does_not() {
        let store = EntityStore::new();
        let first = store.insert(Breed { id: 0, name: "Mixed".into(), pet_type: None }).unwrap();
        let candidate = Breed { id: 0, name: "Mixed".into(), pet_type: None };

        assert_eq!(store.find_duplicate(&candidate, None).unwrap(), Some(first.id));
        assert_eq!(store.find_duplicate(&candidate, Some(first.id)).unwrap(), None);
        assert!(store.insert(candidate).is_ok());
    }

    #[test]
    fn test_insert_checks_foreign_keys() {
        let store = EntityStore::new();
        let err = store.insert(surgery(42, None)).unwrap_err();
        assert_eq!(
            err,
            StorageError::ForeignKeyViolation {
                field: "pet",
                target: EntityKind::Pet,
                id: 42
            }
        );
    }

    #[test]
    fn test_update_excludes_itself_from_uniqueness() {
        let store = EntityStore::new();
        let dog = store.insert(PetType { id: 0, name: "Dog".into() }).unwrap();
        let cat = store.insert(PetType { id: 0, name: "Cat".into() }).unwrap();

        assert!(store.update(PetType { id: dog.id, name: "DOG".into() }).is_ok());
        assert!(store.update(PetType { id: cat.id, name: "dog".into() }).is_err());
        assert!(matches!(
            store.update(PetType { id: 99, name: "Bird".into() }),
            Err(StorageError::NotFound { .. })
        ));
    }

    #[test]
    fn test_delete_vet_nullifies_surgery() {
        let store = EntityStore::new();
        let rex = store.insert(pet("Rex")).unwrap();
        let smith = store.insert(vet("Smith")).unwrap();
        let op = store.insert(surgery(rex.id, Some(smith.id))).unwrap();

        let removed = store.delete::<Vet>(smith.id).unwrap();
        assert_eq!(removed, vec![(EntityKind::Vet, smith.id)]);

        let op = store.get::<Surgery>(op.id).unwrap().unwrap();
        assert_eq!(op.vet, None);
    }

    #[test]
    fn test_delete_pet_cascades_to_surgery() {
        let store = EntityStore::new();
        let rex = store.insert(pet("Rex")).unwrap();
        let op = store.insert(surgery(rex.id, None)).unwrap();

        let removed = store.delete::<Pet>(rex.id).unwrap();
        assert_eq!(removed.len(), 2);
        assert!(store.get::<Surgery>(op.id).unwrap().is_none());
        assert_eq!(store.count(EntityKind::Surgery).unwrap(), 0);
    }

    #[test]
    fn test_delete_pet_type_cascades_through_breed_and_nullifies_pet() {
        let store = EntityStore::new();
        let dog = store.insert(PetType { id: 0, name: "Dog".into() }).unwrap();
        let beagle = store
            .insert(Breed { id: 0, name: "Beagle".into(), pet_type: Some(dog.id) })
            .unwrap();
        let mut rex = pet("Rex");
        rex.pet_type = Some(dog.id);
        rex.breed = Some(beagle.id);
        let rex = store.insert(rex).unwrap();

        store.delete::<PetType>(dog.id).unwrap();

        assert!(store.get::<Breed>(beagle.id).unwrap().is_none());
        let rex = store.get::<Pet>(rex.id).unwrap().unwrap();
        assert_eq!((rex.pet_type, rex.breed), (None, None));
    }

    #[test]
    fn test_delete_missing_row_is_not_found() {
        let store = EntityStore::new();
        assert!(matches!(
            store.delete::<Pet>(7),
            Err(StorageError::NotFound { kind: EntityKind::Pet, id: 7 })
        ));
    }

    #[test]
    fn test_list_where_filters_in_id_order() {
        let store = EntityStore::new();
        let rex = store.insert(pet("Rex")).unwrap();
        let luna = store.insert(pet("Luna")).unwrap();
        store.insert(surgery(rex.id, None)).unwrap();
        let mut other = surgery(luna.id, None);
        other.name = "Dental".into();
        store.insert(other).unwrap();

        let for_rex = store.list_where(|s: &Surgery| s.pet == rex.id).unwrap();
        assert_eq!(for_rex.len(), 1);
        assert_eq!(store.list::<Surgery>().unwrap().len(), 2);
        assert!(store.exists(EntityKind::Pet, luna.id).unwrap());
    }
}

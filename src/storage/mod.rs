//! Relational storage for pet-care records

pub mod in_memory;
pub mod table;

pub use in_memory::EntityStore;
pub use table::{Table, TableOps, Tables};

use crate::core::entity::{EntityId, EntityKind};
use thiserror::Error;

/// Failures raised by the store inside its write lock
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("{kind} with id '{id}' not found")]
    NotFound { kind: EntityKind, id: EntityId },

    #[error("{message}")]
    UniqueViolation {
        kind: EntityKind,
        message: &'static str,
    },

    #[error("{target} with id '{id}' referenced by '{field}' does not exist")]
    ForeignKeyViolation {
        field: &'static str,
        target: EntityKind,
        id: EntityId,
    },

    #[error("store lock poisoned")]
    LockPoisoned,
}

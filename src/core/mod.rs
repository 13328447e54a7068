//! Core module containing fundamental traits and types

pub mod auth;
pub mod entity;
pub mod error;
pub mod field;
pub mod validation;

pub use auth::{AuthContext, AuthPolicy, AuthProvider, HeaderAuthProvider, NoAuthProvider};
pub use entity::{Entity, EntityId, EntityKind, Named, OnDelete, Relation};
pub use error::{ApiError, ApiResult, EntityError, RequestError, ValidationError};
pub use field::{Gender, OwnerType, Sex, Weight};

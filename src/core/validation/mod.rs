//! Validation and filtering system
//!
//! Payloads are filtered and validated field by field before they reach the
//! serializers. Each serializer describes its writable fields with an
//! [`EntityValidationConfig`] per [`Operation`].

pub mod config;
pub mod extractor;
pub mod filters;
pub mod validators;

pub use config::{EntityValidationConfig, Operation, Presence};
pub use extractor::{ResourcePath, ValidatableEntity, Validated};

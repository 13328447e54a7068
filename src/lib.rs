//! # Petcare
//!
//! A REST backend for pet-care record keeping: pets and their owners,
//! veterinary clinics and vets, medical history (allergies, weigh-ins,
//! surgeries, procedures, visits, vaccines, illnesses, treatments) and
//! grooming salons, groomers and appointments.
//!
//! ## Features
//!
//! - **Macro-based records**: `impl_record!` declares fields, relations,
//!   delete policies and unique keys of each record type
//! - **Serializers**: field validation, uniqueness rules and representation
//!   shaping between the wire format and the stored records
//! - **Relational store**: in-memory tables with unique indexes, foreign-key
//!   checks and cascading or nullifying deletes
//! - **Nested resources**: medical records are also served under
//!   `/pets/{pet_id}/...`, scoped to that pet
//! - **Sensitive fields**: vets' and groomers' contact details are only
//!   shown to administrators and configured roles
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use petcare::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = ApiConfig::default_config();
//!     let addr = config.bind_address();
//!     ServerBuilder::new().with_config(config).serve(&addr).await
//! }
//! ```

pub mod config;
pub mod core;
pub mod entities;
pub mod resources;
pub mod serializers;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        auth::{AuthContext, AuthPolicy, AuthProvider, HeaderAuthProvider, NoAuthProvider},
        entity::{Entity, EntityId, EntityKind, Named, OnDelete},
        error::{ApiError, ApiResult},
        field::{Gender, OwnerType, Sex, Weight},
        validation::{Operation, Validated},
    };

    // === Records ===
    pub use crate::entities::*;

    // === Serializers ===
    pub use crate::serializers::{Serializer, SerializerContext};

    // === Storage ===
    pub use crate::storage::{EntityStore, StorageError};

    // === Config ===
    pub use crate::config::{ApiConfig, ServerConfig};

    // === Server ===
    pub use crate::resources::{AppState, ResourceService, Scope};
    pub use crate::server::{EntityDescriptor, EntityRegistry, ServerBuilder, ServerHost};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, NaiveDate, Utc};
    pub use serde::{Deserialize, Serialize};
    pub use uuid::Uuid;
}

//! Typed error handling for the pet-care API
//!
//! Every handler returns [`ApiError`], which renders as a
//! `{code, message, details}` JSON body with a matching status code.
//!
//! # Error Categories
//!
//! - [`EntityError`]: missing records, duplicates and dangling references
//! - [`ValidationError`]: field-level input validation and malformed JSON
//! - [`RequestError`]: request context problems (authentication)
//! - [`StorageError`]: unexpected store failures
//!
//! # Example
//!
//! ```rust,ignore
//! use petcare::prelude::*;
//!
//! fn load(store: &EntityStore, id: EntityId) -> Result<Pet, ApiError> {
//!     store.get::<Pet>(id)?.ok_or(ApiError::Entity(EntityError::NotFound {
//!         entity_type: EntityKind::Pet,
//!         id,
//!     }))
//! }
//! ```

use crate::core::entity::{EntityId, EntityKind};
use crate::storage::StorageError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;
use tracing::error;

/// The main error type returned by handlers
#[derive(Debug)]
pub enum ApiError {
    /// Record-level errors (lookup, uniqueness, references)
    Entity(EntityError),

    /// Validation errors
    Validation(ValidationError),

    /// HTTP/Request errors
    Request(RequestError),

    /// Storage backend errors
    Storage(StorageError),

    /// Internal errors (should not happen in normal operation)
    Internal(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Entity(e) => write!(f, "{}", e),
            ApiError::Validation(e) => write!(f, "{}", e),
            ApiError::Request(e) => write!(f, "{}", e),
            ApiError::Storage(e) => write!(f, "Storage error: {}", e),
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Entity(e) => Some(e),
            ApiError::Validation(e) => Some(e),
            ApiError::Request(e) => Some(e),
            ApiError::Storage(e) => Some(e),
            ApiError::Internal(_) => None,
        }
    }
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Entity(e) => e.status_code(),
            ApiError::Validation(e) => e.status_code(),
            ApiError::Request(e) => e.status_code(),
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Entity(e) => e.error_code(),
            ApiError::Validation(e) => e.error_code(),
            ApiError::Request(e) => e.error_code(),
            ApiError::Storage(_) => "STORAGE_ERROR",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    /// Get additional details for the error
    fn details(&self) -> Option<serde_json::Value> {
        match self {
            ApiError::Entity(EntityError::NotFound { entity_type, id }) => {
                Some(serde_json::json!({
                    "entity_type": entity_type.singular(),
                    "id": id
                }))
            }
            ApiError::Entity(EntityError::DuplicateRecord { entity_type, .. }) => {
                Some(serde_json::json!({ "entity_type": entity_type.singular() }))
            }
            ApiError::Entity(EntityError::ReferenceNotFound {
                field,
                entity_type,
                id,
            }) => Some(serde_json::json!({
                "field": format!("{}_id", field),
                "entity_type": entity_type.singular(),
                "id": id
            })),
            ApiError::Validation(ValidationError::FieldError { field, message }) => {
                Some(serde_json::json!({
                    "fields": [FieldValidationError::new(field.clone(), message.clone())]
                }))
            }
            ApiError::Validation(ValidationError::FieldErrors(errors)) => {
                Some(serde_json::json!({ "fields": errors }))
            }
            _ => None,
        }
    }

    /// Shorthand for a single-field validation failure
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::Validation(ValidationError::FieldError {
            field: field.into(),
            message: message.into(),
        })
    }

    /// Shorthand for a missing record
    pub fn not_found(entity_type: EntityKind, id: EntityId) -> Self {
        ApiError::Entity(EntityError::NotFound { entity_type, id })
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Entity Errors
// =============================================================================

/// Errors related to record operations
#[derive(Debug)]
pub enum EntityError {
    /// Record was not found
    NotFound {
        entity_type: EntityKind,
        id: EntityId,
    },

    /// A uniqueness rule was violated
    DuplicateRecord {
        entity_type: EntityKind,
        message: String,
    },

    /// A supplied foreign key does not resolve
    ReferenceNotFound {
        field: String,
        entity_type: EntityKind,
        id: EntityId,
    },
}

impl fmt::Display for EntityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityError::NotFound { entity_type, id } => {
                write!(f, "{} with id '{}' not found", entity_type, id)
            }
            EntityError::DuplicateRecord { message, .. } => write!(f, "{}", message),
            EntityError::ReferenceNotFound {
                entity_type, id, ..
            } => {
                write!(f, "Invalid pk \"{}\" - {} does not exist.", id, entity_type)
            }
        }
    }
}

impl std::error::Error for EntityError {}

impl EntityError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            EntityError::NotFound { .. } => StatusCode::NOT_FOUND,
            EntityError::DuplicateRecord { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            EntityError::ReferenceNotFound { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            EntityError::NotFound { .. } => "ENTITY_NOT_FOUND",
            EntityError::DuplicateRecord { .. } => "DUPLICATE_RECORD",
            EntityError::ReferenceNotFound { .. } => "REFERENCE_NOT_FOUND",
        }
    }
}

impl From<EntityError> for ApiError {
    fn from(err: EntityError) -> Self {
        ApiError::Entity(err)
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors related to input validation
#[derive(Debug)]
pub enum ValidationError {
    /// Single field validation error
    FieldError { field: String, message: String },

    /// Multiple field validation errors
    FieldErrors(Vec<FieldValidationError>),

    /// Body is not valid JSON
    InvalidJson { message: String },
}

/// A single field validation error
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldValidationError {
    pub field: String,
    pub message: String,
}

impl FieldValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::FieldError { field, message } => {
                write!(f, "Validation error for field '{}': {}", field, message)
            }
            ValidationError::FieldErrors(errors) => {
                let msgs: Vec<String> = errors
                    .iter()
                    .map(|e| format!("{}: {}", e.field, e.message))
                    .collect();
                write!(f, "Validation errors: {}", msgs.join(", "))
            }
            ValidationError::InvalidJson { message } => {
                write!(f, "Invalid JSON: {}", message)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl ValidationError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ValidationError::InvalidJson { .. } => StatusCode::BAD_REQUEST,
            _ => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ValidationError::InvalidJson { .. } => "INVALID_JSON",
            _ => "VALIDATION_ERROR",
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation(err)
    }
}

impl From<Vec<FieldValidationError>> for ApiError {
    fn from(errors: Vec<FieldValidationError>) -> Self {
        ApiError::Validation(ValidationError::FieldErrors(errors))
    }
}

// =============================================================================
// Request Errors
// =============================================================================

/// Errors related to the request context
#[derive(Debug)]
pub enum RequestError {
    /// The operation needs an authenticated user
    Unauthorized { message: String },

    /// A path parameter could not be parsed
    InvalidPath { message: String },
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::Unauthorized { message } => write!(f, "Unauthorized: {}", message),
            RequestError::InvalidPath { message } => write!(f, "Invalid path: {}", message),
        }
    }
}

impl std::error::Error for RequestError {}

impl RequestError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RequestError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            RequestError::InvalidPath { .. } => StatusCode::BAD_REQUEST,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            RequestError::Unauthorized { .. } => "UNAUTHORIZED",
            RequestError::InvalidPath { .. } => "INVALID_PATH",
        }
    }
}

impl From<RequestError> for ApiError {
    fn from(err: RequestError) -> Self {
        ApiError::Request(err)
    }
}

// =============================================================================
// Conversions from other error types
// =============================================================================

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound { kind, id } => ApiError::not_found(kind, id),
            StorageError::UniqueViolation { kind, message } => {
                ApiError::Entity(EntityError::DuplicateRecord {
                    entity_type: kind,
                    message: message.to_string(),
                })
            }
            StorageError::ForeignKeyViolation { field, target, id } => {
                ApiError::Entity(EntityError::ReferenceNotFound {
                    field: field.to_string(),
                    entity_type: target,
                    id,
                })
            }
            other => ApiError::Storage(other),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Validation(ValidationError::InvalidJson {
            message: err.to_string(),
        })
    }
}

/// A specialized Result type for handler operations
pub type ApiResult<T> = Result<T, ApiError>;

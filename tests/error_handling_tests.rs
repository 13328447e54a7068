//! Tests for the typed error handling system
//!
//! These tests verify that:
//! - Errors return correct HTTP status codes
//! - Error responses carry a stable code and per-field details
//! - Store failures convert into the matching API error

mod common;

use axum::http::{HeaderValue, StatusCode};
use axum::response::IntoResponse;
use common::*;
use petcare::core::error::{EntityError, RequestError, ValidationError};
use petcare::prelude::*;
use serde_json::{Value, json};

// =============================================================================
// Status codes and conversions
// =============================================================================

mod status_code_tests {
    use super::*;

    #[test]
    fn test_not_found_returns_404() {
        let err = ApiError::not_found(EntityKind::Vet, 4);
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.error_code(), "ENTITY_NOT_FOUND");
    }

    #[test]
    fn test_duplicate_returns_422() {
        let err = ApiError::Entity(EntityError::DuplicateRecord {
            entity_type: EntityKind::PetType,
            message: "Pet type with this name already exists.".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_invalid_json_returns_400() {
        let err = ApiError::Validation(ValidationError::InvalidJson {
            message: "expected value".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_unauthorized_returns_401() {
        let err = ApiError::Request(RequestError::Unauthorized {
            message: "no user".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_lock_poisoned_is_a_server_error() {
        let err: ApiError = StorageError::LockPoisoned.into();
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_foreign_key_violation_names_the_wire_field() {
        let err: ApiError = StorageError::ForeignKeyViolation {
            field: "vet",
            target: EntityKind::Vet,
            id: 12,
        }
        .into();
        let details = err.to_response().details.expect("reference details");
        assert_eq!(details["field"], "vet_id");
        assert_eq!(details["id"], 12);
    }
}

// =============================================================================
// Error responses over HTTP
// =============================================================================

#[tokio::test]
async fn test_malformed_body_is_invalid_json() {
    let server = server();

    let response = server.post("/pets/").text("{not json").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["code"], "INVALID_JSON");
}

#[tokio::test]
async fn test_missing_fields_are_all_reported() {
    let server = server();

    let response = server.post("/pets/").json(&json!({ "name": "Luna" })).await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body = response.json::<Value>();
    let fields: Vec<&str> = body["details"]["fields"]
        .as_array()
        .expect("field list")
        .iter()
        .filter_map(|f| f["field"].as_str())
        .collect();
    assert_eq!(fields, vec!["sex", "birthdate", "color"]);
}

#[tokio::test]
async fn test_unknown_record_is_not_found() {
    let server = server();

    let response = server.get("/vaccines/42/").await;
    response.assert_status(StatusCode::NOT_FOUND);
    let body = response.json::<Value>();
    assert_eq!(body["code"], "ENTITY_NOT_FOUND");
    assert_eq!(body["details"]["entity_type"], "vaccine");
}

#[tokio::test]
async fn test_unknown_id_is_reported_before_payload_errors() {
    let server = server();

    server
        .put("/surgeries/42/")
        .json(&json!({}))
        .await
        .assert_status(StatusCode::NOT_FOUND);
    server
        .patch("/pets/42")
        .json(&json!({ "sex": "X" }))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_reference_is_rejected() {
    let server = server();
    let luna = seed_pet(&server, "Luna").await;

    let response = server
        .post("/vet_visits/")
        .json(&json!({
            "pet_id": luna,
            "vet_id": 77,
            "date": "2024-02-01",
            "reason": "Checkup",
            "outcome": "Healthy"
        }))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.json::<Value>()["code"], "REFERENCE_NOT_FOUND");
}

#[tokio::test]
async fn test_duplicate_pet_type_is_case_insensitive() {
    let server = server();
    create(&server, "/pet_types/", json!({ "name": "Dog" })).await;

    let response = server.post("/pet_types/").json(&json!({ "name": "dog" })).await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.json::<Value>()["code"], "DUPLICATE_RECORD");
}

#[tokio::test]
async fn test_malformed_user_header_is_unauthorized() {
    let server = server();

    let response = server
        .get("/pets/")
        .add_header(USER_ID, HeaderValue::from_static("not-a-uuid"))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<Value>()["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_non_numeric_id_is_a_json_error() {
    let server = server();

    let response = server.get("/pets/abc/").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["code"], "INVALID_PATH");

    let nested = server.get("/pets/1/surgeries/xyz").await;
    nested.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(nested.json::<Value>()["code"], "INVALID_PATH");
}

//! Shared harness for the HTTP integration tests
#![allow(dead_code)]

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use petcare::prelude::*;
use serde_json::{Value, json};
use std::sync::Arc;

pub const USER_ID: HeaderName = HeaderName::from_static("x-user-id");
pub const USER_ROLES: HeaderName = HeaderName::from_static("x-user-roles");

/// Server over a fresh store with the default configuration
pub fn server() -> TestServer {
    server_with(ApiConfig::default_config())
}

pub fn server_with(config: ApiConfig) -> TestServer {
    let app = ServerBuilder::new()
        .with_config(config)
        .build()
        .expect("Failed to build app");
    TestServer::new(app)
}

/// Server sharing `store` with the caller
pub fn server_with_store(store: Arc<EntityStore>) -> TestServer {
    let app = ServerBuilder::new()
        .with_store(store)
        .build()
        .expect("Failed to build app");
    TestServer::new(app)
}

pub fn user_header(user: Uuid) -> HeaderValue {
    HeaderValue::from_str(&user.to_string()).expect("uuid is a valid header value")
}

/// POST `body` to `path`, expecting 201, and return the representation
pub async fn create(server: &TestServer, path: &str, body: Value) -> Value {
    let response = server.post(path).json(&body).await;
    response.assert_status(StatusCode::CREATED);
    response.json::<Value>()
}

pub fn id_of(value: &Value) -> i64 {
    value["id"].as_i64().expect("representation carries an integer id")
}

pub async fn seed_pet(server: &TestServer, name: &str) -> i64 {
    let pet = create(
        server,
        "/pets/",
        json!({
            "name": name,
            "sex": "F",
            "birthdate": "2021-05-04",
            "color": "Black"
        }),
    )
    .await;
    id_of(&pet)
}

pub async fn seed_vet(server: &TestServer, name: &str) -> i64 {
    let vet = create(
        server,
        "/vets/",
        json!({
            "name": name,
            "gender": "M",
            "email": "jones@clinic.test",
            "phone": "555-0199"
        }),
    )
    .await;
    id_of(&vet)
}

pub async fn seed_surgery(server: &TestServer, pet: i64, vet: Option<i64>) -> i64 {
    let surgery = create(
        server,
        "/surgeries/",
        json!({
            "pet_id": pet,
            "vet_id": vet,
            "date": "2024-02-01",
            "name": "Spay",
            "description": "Routine"
        }),
    )
    .await;
    id_of(&surgery)
}

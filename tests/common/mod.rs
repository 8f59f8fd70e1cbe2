#![allow(dead_code)]

use axum::{Router, routing::get};
use axum_test::TestServer;
use membership_api::api::handlers::health_handler;
use membership_api::api::routes::v1_routes;
use membership_api::infrastructure::memory::MemoryStore;
use membership_api::state::AppState;
use serde_json::{Value, json};
use std::sync::Arc;

pub const TEST_PAGE_SIZE: u32 = 15;

/// State over a fresh in-memory store. The store handle is returned for
/// direct inspection of membership rows.
pub fn create_test_state() -> (AppState, MemoryStore) {
    let store = MemoryStore::new();
    let state = AppState::new(
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        TEST_PAGE_SIZE,
    );
    (state, store)
}

/// The application routes without the per-IP limiter, which needs a peer
/// address the test transport does not provide.
pub fn make_server() -> (TestServer, MemoryStore) {
    let (state, store) = create_test_state();
    let app = Router::new()
        .route("/health", get(health_handler))
        .nest("/api/v1", v1_routes())
        .with_state(state);
    (TestServer::new(app).unwrap(), store)
}

pub async fn create_user(server: &TestServer, name: &str) -> i64 {
    let response = server
        .post("/api/v1/users")
        .json(&json!({ "name": name }))
        .await;
    response.json::<Value>()["id"].as_i64().unwrap()
}

pub async fn create_company(server: &TestServer, name: &str) -> i64 {
    let response = server
        .post("/api/v1/companies")
        .json(&json!({ "name": name }))
        .await;
    response.json::<Value>()["id"].as_i64().unwrap()
}

/// Ids of the `{id, name}` items under `key`.
pub fn related_ids(body: &Value, key: &str) -> Vec<i64> {
    body[key]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_i64().unwrap())
        .collect()
}

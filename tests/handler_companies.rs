mod common;

use axum::http::StatusCode;
use serde_json::{Value, json};

use common::{create_company, create_user, make_server, related_ids};

#[tokio::test]
async fn test_acme_scenario() {
    let (server, store) = make_server();
    for i in 1..=8 {
        create_user(&server, &format!("user-{i}")).await;
    }

    let response = server
        .post("/api/v1/companies")
        .json(&json!({"name": "Acme"}))
        .await;

    response.assert_status(StatusCode::CREATED);
    assert_eq!(response.json::<Value>(), json!({"id": 1, "name": "Acme"}));

    let response = server
        .put("/api/v1/companies/1/users")
        .json(&json!({"users": [7, 8]}))
        .await;

    response.assert_status_ok();
    assert_eq!(
        response.json::<Value>(),
        json!({
            "id": 1,
            "name": "Acme",
            "users": [{"id": 7, "name": "user-7"}, {"id": 8, "name": "user-8"}]
        })
    );
    assert_eq!(store.memberships().await, vec![(7, 1), (8, 1)]);
}

// ─── LIST ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_companies_structure() {
    let (server, _store) = make_server();
    let ada = create_user(&server, "Ada").await;
    server
        .post("/api/v1/companies")
        .json(&json!({"name": "Acme", "users": [ada]}))
        .await
        .assert_status(StatusCode::CREATED);

    let response = server.get("/api/v1/companies").await;

    response.assert_status_ok();

    let json = response.json::<Value>();
    assert!(json.get("pagination").is_some());
    assert_eq!(json["pagination"]["total_items"], 1);
    assert_eq!(
        json["items"],
        json!([{"id": 1, "name": "Acme", "users": [{"id": ada, "name": "Ada"}]}])
    );
}

#[tokio::test]
async fn test_list_companies_page_zero() {
    let (server, _store) = make_server();

    let response = server
        .get("/api/v1/companies")
        .add_query_param("page", 0)
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_list_companies_hides_deleted_members() {
    let (server, _store) = make_server();
    let ada = create_user(&server, "Ada").await;
    let grace = create_user(&server, "Grace").await;
    let acme = server
        .post("/api/v1/companies")
        .json(&json!({"name": "Acme", "users": [ada, grace]}))
        .await
        .json::<Value>()["id"]
        .as_i64()
        .unwrap();

    server
        .delete(&format!("/api/v1/users/{ada}"))
        .await
        .assert_status_ok();

    let json = server
        .get(&format!("/api/v1/companies/{acme}"))
        .await
        .json::<Value>();
    assert_eq!(related_ids(&json, "users"), vec![grace]);
}

// ─── CREATE ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_company_with_users() {
    let (server, store) = make_server();
    let ada = create_user(&server, "Ada").await;

    let response = server
        .post("/api/v1/companies")
        .json(&json!({"name": "Acme", "users": [ada]}))
        .await;

    response.assert_status(StatusCode::CREATED);

    let json = response.json::<Value>();
    let acme = json["id"].as_i64().unwrap();
    assert_eq!(json["users"], json!([{"id": ada, "name": "Ada"}]));
    assert_eq!(store.memberships().await, vec![(ada, acme)]);
}

#[tokio::test]
async fn test_create_company_name_too_long() {
    let (server, _store) = make_server();

    let response = server
        .post("/api/v1/companies")
        .json(&json!({"name": "x".repeat(256)}))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.json::<Value>()["error"]["details"]["name"].is_array());
}

#[tokio::test]
async fn test_create_company_unknown_users() {
    let (server, _store) = make_server();

    let response = server
        .post("/api/v1/companies")
        .json(&json!({"name": "Acme", "users": [3, 4]}))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        response.json::<Value>()["error"]["details"]["users"],
        json!([
            "The selected user 3 is invalid",
            "The selected user 4 is invalid"
        ])
    );
}

#[tokio::test]
async fn test_create_company_users_not_an_array() {
    let (server, _store) = make_server();

    let response = server
        .post("/api/v1/companies")
        .json(&json!({"name": "Acme", "users": "abc"}))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    let json = response.json::<Value>();
    assert_eq!(json["error"]["code"], "validation_error");
    assert!(json["error"]["details"]["users"].is_array());
}

// ─── SHOW / UPDATE ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_show_company_with_no_users() {
    let (server, _store) = make_server();
    let acme = create_company(&server, "Acme").await;

    let response = server.get(&format!("/api/v1/companies/{acme}")).await;

    response.assert_status_ok();
    assert_eq!(
        response.json::<Value>(),
        json!({"id": acme, "name": "Acme", "users": []})
    );
}

#[tokio::test]
async fn test_show_company_non_numeric_id() {
    let (server, _store) = make_server();

    let response = server.get("/api/v1/companies/acme").await;

    response.assert_status_not_found();
    assert_eq!(response.json::<Value>()["error"]["code"], "not_found");
}

#[tokio::test]
async fn test_update_company_name_keeps_users() {
    let (server, store) = make_server();
    let ada = create_user(&server, "Ada").await;
    let acme = server
        .post("/api/v1/companies")
        .json(&json!({"name": "Acme", "users": [ada]}))
        .await
        .json::<Value>()["id"]
        .as_i64()
        .unwrap();

    let response = server
        .put(&format!("/api/v1/companies/{acme}"))
        .json(&json!({"name": "Acme Corp"}))
        .await;

    response.assert_status_ok();

    let json = response.json::<Value>();
    assert_eq!(json["name"], "Acme Corp");
    assert_eq!(related_ids(&json, "users"), vec![ada]);
    assert_eq!(store.memberships().await, vec![(ada, acme)]);
}

#[tokio::test]
async fn test_update_company_validation_runs_before_lookup() {
    let (server, _store) = make_server();

    let response = server
        .patch("/api/v1/companies/99")
        .json(&json!({"name": ""}))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

// ─── DELETE ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_delete_company() {
    let (server, store) = make_server();
    let acme = create_company(&server, "Acme").await;

    let response = server.delete(&format!("/api/v1/companies/{acme}")).await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), json!({"id": acme, "name": "Acme"}));
    assert!(store.company_with_deleted(acme).await.unwrap().is_deleted());

    server
        .get(&format!("/api/v1/companies/{acme}"))
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_delete_company_not_found() {
    let (server, _store) = make_server();

    server
        .delete("/api/v1/companies/1")
        .await
        .assert_status_not_found();
}

// ─── SYNC ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_sync_users_on_deleted_company() {
    let (server, _store) = make_server();
    let acme = create_company(&server, "Acme").await;
    server
        .delete(&format!("/api/v1/companies/{acme}"))
        .await
        .assert_status_ok();

    let response = server
        .put(&format!("/api/v1/companies/{acme}/users"))
        .json(&json!({"users": []}))
        .await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn test_sync_users_is_visible_from_user_side() {
    let (server, _store) = make_server();
    let ada = create_user(&server, "Ada").await;
    let acme = create_company(&server, "Acme").await;

    server
        .put(&format!("/api/v1/companies/{acme}/users"))
        .json(&json!({"users": [ada]}))
        .await
        .assert_status_ok();

    let user = server
        .get(&format!("/api/v1/users/{ada}"))
        .await
        .json::<Value>();
    assert_eq!(user["companies"], json!([{"id": acme, "name": "Acme"}]));
}

#[tokio::test]
async fn test_sync_users_null_is_rejected() {
    let (server, _store) = make_server();
    let acme = create_company(&server, "Acme").await;

    let response = server
        .put(&format!("/api/v1/companies/{acme}/users"))
        .json(&json!({"users": null}))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

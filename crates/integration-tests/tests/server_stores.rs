//! Integration tests for store management.
//!
//! These tests require:
//! - A running server (cargo run -p quitanda-server)
//! - `SECRET_KEY` exported with the server's signing secret
//! - The demo user seeded (cargo run -p quitanda-cli -- seed)
//!
//! Run with: cargo test -p quitanda-integration-tests -- --ignored

use reqwest::{StatusCode, header};
use serde_json::{Value, json};
use uuid::Uuid;

use quitanda_integration_tests::{base_url, client, demo_user_cookie};

/// A store payload with a CNPJ unique to this test run.
fn store_payload() -> Value {
    json!({
        "name": "Integration Test Store",
        "cnpj": format!("it-{}", Uuid::new_v4()),
        "employees": 2,
        "address": "Rua dos Testes, 1",
    })
}

#[tokio::test]
#[ignore = "Requires running server, SECRET_KEY, and seeded demo user"]
async fn test_store_crud_roundtrip() {
    let client = client();
    let Some(cookie) = demo_user_cookie(&client).await else {
        return;
    };
    let base_url = base_url();

    // Create
    let resp = client
        .post(format!("{base_url}/stores"))
        .header(header::COOKIE, &cookie)
        .json(&store_payload())
        .send()
        .await
        .expect("Failed to create store");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let store: Value = resp.json().await.expect("Failed to parse store");
    let store_id = store
        .get("id")
        .and_then(Value::as_str)
        .expect("Store missing id")
        .to_string();

    // List contains it
    let resp = client
        .get(format!("{base_url}/stores"))
        .header(header::COOKIE, &cookie)
        .send()
        .await
        .expect("Failed to list stores");
    assert_eq!(resp.status(), StatusCode::OK);
    let stores: Vec<Value> = resp.json().await.expect("Failed to parse stores");
    assert!(
        stores
            .iter()
            .any(|s| s.get("id").and_then(Value::as_str) == Some(store_id.as_str()))
    );

    // Update
    let resp = client
        .put(format!("{base_url}/stores/{store_id}"))
        .header(header::COOKIE, &cookie)
        .json(&json!({ "name": "Renamed Store" }))
        .send()
        .await
        .expect("Failed to update store");
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = resp.json().await.expect("Failed to parse store");
    assert_eq!(
        updated.get("name").and_then(Value::as_str),
        Some("Renamed Store")
    );
    // Unchanged field survives the partial update
    assert_eq!(
        updated.get("employees").and_then(Value::as_i64),
        Some(2)
    );

    // Delete
    let resp = client
        .delete(format!("{base_url}/stores/{store_id}"))
        .header(header::COOKIE, &cookie)
        .send()
        .await
        .expect("Failed to delete store");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    // Gone
    let resp = client
        .get(format!("{base_url}/stores/{store_id}"))
        .header(header::COOKIE, &cookie)
        .send()
        .await
        .expect("Failed to fetch store");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running server, SECRET_KEY, and seeded demo user"]
async fn test_duplicate_cnpj_conflicts() {
    let client = client();
    let Some(cookie) = demo_user_cookie(&client).await else {
        return;
    };
    let base_url = base_url();
    let payload = store_payload();

    let resp = client
        .post(format!("{base_url}/stores"))
        .header(header::COOKIE, &cookie)
        .json(&payload)
        .send()
        .await
        .expect("Failed to create store");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let store: Value = resp.json().await.expect("Failed to parse store");

    let resp = client
        .post(format!("{base_url}/stores"))
        .header(header::COOKIE, &cookie)
        .json(&payload)
        .send()
        .await
        .expect("Failed to post duplicate store");
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // Cleanup
    if let Some(id) = store.get("id").and_then(Value::as_str) {
        let _ = client
            .delete(format!("{base_url}/stores/{id}"))
            .header(header::COOKIE, &cookie)
            .send()
            .await;
    }
}

#[tokio::test]
#[ignore = "Requires running server, SECRET_KEY, and seeded demo user"]
async fn test_blank_name_rejected() {
    let client = client();
    let Some(cookie) = demo_user_cookie(&client).await else {
        return;
    };

    let mut payload = store_payload();
    payload["name"] = json!("   ");

    let resp = client
        .post(format!("{}/stores", base_url()))
        .header(header::COOKIE, &cookie)
        .json(&payload)
        .send()
        .await
        .expect("Failed to post store");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = resp.json().await.expect("Failed to parse error");
    assert!(body.get("detail").is_some());
}

#[tokio::test]
#[ignore = "Requires running server, SECRET_KEY, and seeded demo user"]
async fn test_unknown_store_is_not_found() {
    let client = client();
    let Some(cookie) = demo_user_cookie(&client).await else {
        return;
    };

    let resp = client
        .get(format!(
            "{}/stores/{}",
            base_url(),
            "00000000-0000-0000-0000-000000000000"
        ))
        .header(header::COOKIE, &cookie)
        .send()
        .await
        .expect("Failed to fetch store");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

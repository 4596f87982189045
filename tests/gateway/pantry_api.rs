use crate::gateway_harness::GatewayTestServer;
use larder::config::StoreBackendKind;
use reqwest::StatusCode;
use serde_json::{Value, json};

// Pantry routes never reach the provider.
const NO_PROVIDER: &str = "http://127.0.0.1:9";

#[tokio::test]
async fn health_reports_store_and_count() {
    let server = GatewayTestServer::start(NO_PROVIDER, StoreBackendKind::Memory).await;

    let body: Value = reqwest::get(server.url("/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["status"], "ok");
    assert_eq!(body["store"], "memory");
    assert_eq!(body["ingredients"], 0);
}

#[tokio::test]
async fn ingredient_crud_round_trip() {
    let server = GatewayTestServer::start(NO_PROVIDER, StoreBackendKind::Memory).await;
    let client = reqwest::Client::new();

    let created = client
        .post(server.url("/api/ingredients"))
        .json(&json!({ "name": "  Flour ", "quantity": 500, "unit": "g" }))
        .send()
        .await
        .unwrap();
    assert_eq!(created.status(), StatusCode::CREATED);
    let flour: Value = created.json().await.unwrap();
    assert_eq!(flour["name"], "Flour");
    assert!(!flour["id"].as_str().unwrap().is_empty());

    client
        .post(server.url("/api/ingredients"))
        .json(&json!({ "name": "Sugar", "quantity": "0.5", "unit": "cup" }))
        .send()
        .await
        .unwrap();

    let list: Vec<Value> = client
        .get(server.url("/api/ingredients"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[1]["quantity"], 0.5);

    let removed = client
        .delete(server.url("/api/ingredients/0"))
        .send()
        .await
        .unwrap();
    assert_eq!(removed.status(), StatusCode::OK);
    assert_eq!(removed.json::<Value>().await.unwrap()["name"], "Flour");

    let missing = client
        .delete(server.url("/api/ingredients/7"))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_ingredient_is_rejected() {
    let server = GatewayTestServer::start(NO_PROVIDER, StoreBackendKind::Memory).await;
    let client = reqwest::Client::new();

    for body in [
        json!({ "name": "", "quantity": 1, "unit": "g" }),
        json!({ "name": "Salt", "quantity": -2, "unit": "g" }),
        json!({ "name": "Salt", "quantity": "pinch", "unit": "g" }),
        json!({ "name": "Salt" }),
    ] {
        let response = client
            .post(server.url("/api/ingredients"))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body}");
    }

    let list: Vec<Value> = client
        .get(server.url("/api/ingredients"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(list.is_empty());
}

#[tokio::test]
async fn suggest_matches_substrings() {
    let server = GatewayTestServer::start(NO_PROVIDER, StoreBackendKind::Memory).await;
    let client = reqwest::Client::new();

    let body: Value = client
        .get(server.url("/api/ingredients/suggest?q=choc"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["suggestions"], json!(["Chocolate"]));

    let empty: Value = client
        .get(server.url("/api/ingredients/suggest"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(empty["suggestions"], json!([]));
}

#[tokio::test]
async fn preferences_toggle_and_notes() {
    let server = GatewayTestServer::start(NO_PROVIDER, StoreBackendKind::Memory).await;
    let client = reqwest::Client::new();

    let initial: Value = client
        .get(server.url("/api/preferences"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(initial["summary"], "No dietary preferences set");

    client
        .post(server.url("/api/preferences/restrictions/toggle"))
        .json(&json!({ "value": "Vegan" }))
        .send()
        .await
        .unwrap();
    let updated: Value = client
        .put(server.url("/api/preferences/notes"))
        .json(&json!({ "notes": "no mushrooms" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(updated["restrictions"], json!(["Vegan"]));
    assert_eq!(updated["additionalNotes"], "no mushrooms");
    assert_eq!(updated["summary"], "Restrictions: Vegan • Notes: no mushrooms");

    let toggled_off: Value = client
        .post(server.url("/api/preferences/restrictions/toggle"))
        .json(&json!({ "value": "Vegan" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(toggled_off["restrictions"], json!([]));
}

#[tokio::test]
async fn catalog_lists_vocabularies() {
    let server = GatewayTestServer::start(NO_PROVIDER, StoreBackendKind::Memory).await;

    let body: Value = reqwest::get(server.url("/api/catalog"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert!(body["units"].as_array().unwrap().contains(&json!("tbsp")));
    assert!(body["restrictions"].as_array().unwrap().contains(&json!("Gluten-Free")));
    assert!(body["cuisines"].as_array().unwrap().contains(&json!("Thai")));
    assert!(body["ingredients"].as_array().unwrap().contains(&json!("Zucchini")));
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let server = GatewayTestServer::start(NO_PROVIDER, StoreBackendKind::Memory).await;

    let response = reqwest::Client::new()
        .put(server.url("/api/preferences/notes"))
        .json(&json!({ "notes": "x".repeat(70_000) }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn sqlite_backend_writes_database_file() {
    let first = GatewayTestServer::start(NO_PROVIDER, StoreBackendKind::Sqlite).await;
    let client = reqwest::Client::new();
    client
        .post(first.url("/api/ingredients"))
        .json(&json!({ "name": "Oats", "quantity": 1, "unit": "cup" }))
        .send()
        .await
        .unwrap();
    assert!(first.workspace.path().join("store").join("larder.db").exists());
}

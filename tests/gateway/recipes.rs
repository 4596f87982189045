use crate::gateway_harness::GatewayTestServer;
use larder::config::StoreBackendKind;
use reqwest::StatusCode;
use serde_json::{Value, json};
use std::time::Duration;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const RECIPE: &str = "GARLIC RICE\nIngredients:\n1. Rinse rice\n\nServes 2";

async fn completion_server(status: u16, body: Value) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(&server)
        .await;
    server
}

fn recipe_reply(text: &str) -> Value {
    json!({ "choices": [{ "message": { "role": "assistant", "content": text } }] })
}

#[tokio::test]
async fn generate_recipe_returns_provider_text() {
    let provider = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("Rice (1 cup), Garlic (3 clove)"))
        .and(body_string_contains("Dietary Restrictions: Vegan"))
        .respond_with(ResponseTemplate::new(200).set_body_json(recipe_reply(RECIPE)))
        .expect(1)
        .mount(&provider)
        .await;
    let server = GatewayTestServer::start(&provider.uri(), StoreBackendKind::Memory).await;

    let response = reqwest::Client::new()
        .post(server.url("/api/generate-recipe"))
        .json(&json!({
            "ingredients": [
                {"id": "1", "name": "Rice", "quantity": 1, "unit": "cup"},
                {"id": "2", "name": "Garlic", "quantity": 3, "unit": "clove"}
            ],
            "dietaryPreferences": {"restrictions": ["Vegan"], "preferences": [], "additionalNotes": ""}
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "recipe": RECIPE }));
}

#[tokio::test]
async fn generate_recipe_validates_ingredient_list() {
    let provider = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(recipe_reply(RECIPE)))
        .expect(0)
        .mount(&provider)
        .await;
    let server = GatewayTestServer::start(&provider.uri(), StoreBackendKind::Memory).await;
    let client = reqwest::Client::new();

    for body in [
        json!({}),
        json!({ "ingredients": [] }),
        json!({ "ingredients": "eggs" }),
        json!({ "ingredients": [{ "name": "Egg" }] }),
    ] {
        let response = client
            .post(server.url("/api/generate-recipe"))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body}");
        let error: Value = response.json().await.unwrap();
        assert_eq!(error["error"], "Please provide a valid list of ingredients");
    }
}

#[tokio::test]
async fn provider_failure_is_a_generic_500() {
    let provider = completion_server(500, json!({ "error": { "message": "upstream exploded" } })).await;
    let server = GatewayTestServer::start(&provider.uri(), StoreBackendKind::Memory).await;

    let response = reqwest::Client::new()
        .post(server.url("/api/generate-recipe"))
        .json(&json!({ "ingredients": [{ "name": "Egg", "quantity": 2, "unit": "piece" }] }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Failed to generate recipe" }));
}

#[tokio::test]
async fn slow_provider_is_reported_before_the_request_times_out() {
    // The harness gives requests 5s; the completion call gets less than that.
    let provider = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(recipe_reply(RECIPE))
                .set_delay(Duration::from_secs(8)),
        )
        .mount(&provider)
        .await;
    let server = GatewayTestServer::start(&provider.uri(), StoreBackendKind::Memory).await;

    let response = reqwest::Client::new()
        .post(server.url("/api/generate-recipe"))
        .json(&json!({ "ingredients": [{ "name": "Egg", "quantity": 2, "unit": "piece" }] }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Failed to generate recipe" }));
}

#[tokio::test]
async fn empty_choices_are_a_failure() {
    let provider = completion_server(200, json!({ "choices": [] })).await;
    let server = GatewayTestServer::start(&provider.uri(), StoreBackendKind::Memory).await;

    let response = reqwest::Client::new()
        .post(server.url("/api/generate-recipe"))
        .json(&json!({ "ingredients": [{ "name": "Egg", "quantity": 2, "unit": "piece" }] }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn pantry_recipe_uses_stored_state_and_returns_blocks() {
    let provider = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("Egg (2 piece)"))
        .and(body_string_contains("Cuisine Preferences: Thai"))
        .respond_with(ResponseTemplate::new(200).set_body_json(recipe_reply(RECIPE)))
        .expect(1)
        .mount(&provider)
        .await;
    let server = GatewayTestServer::start(&provider.uri(), StoreBackendKind::Memory).await;
    let client = reqwest::Client::new();

    let empty = client.post(server.url("/api/recipes")).send().await.unwrap();
    assert_eq!(empty.status(), StatusCode::BAD_REQUEST);

    client
        .post(server.url("/api/ingredients"))
        .json(&json!({ "name": "Egg", "quantity": "2", "unit": "piece" }))
        .send()
        .await
        .unwrap();
    client
        .post(server.url("/api/preferences/cuisines/toggle"))
        .json(&json!({ "value": "Thai" }))
        .send()
        .await
        .unwrap();

    let response = client.post(server.url("/api/recipes")).send().await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["recipe"], RECIPE);
    let kinds: Vec<&str> = body["blocks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|block| block["kind"].as_str().unwrap())
        .collect();
    assert_eq!(kinds, vec!["header", "header", "step", "blank", "paragraph"]);
}

use crate::gateway_harness::{GatewayTestServer, eventually};
use futures_util::{SinkExt, StreamExt};
use larder::config::StoreBackendKind;
use serde_json::{Value, json};
use std::time::Duration;
use tokio_tungstenite::{connect_async, tungstenite::Message};

const NO_PROVIDER: &str = "http://127.0.0.1:9";

type Socket = tokio_tungstenite::WebSocketStream<
    tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
>;

async fn next_json(socket: &mut Socket) -> Value {
    loop {
        let frame = tokio::time::timeout(Duration::from_secs(2), socket.next())
            .await
            .expect("websocket message should arrive")
            .expect("websocket should stay open")
            .expect("websocket frame should be readable");
        if let Message::Text(text) = frame {
            return serde_json::from_str(&text).expect("server messages are json");
        }
    }
}

#[tokio::test]
async fn websocket_streams_store_changes() {
    let server = GatewayTestServer::start(NO_PROVIDER, StoreBackendKind::Memory).await;
    let (mut socket, _) = connect_async(server.ws_url()).await.unwrap();

    let hello = next_json(&mut socket).await;
    assert_eq!(hello["type"], "connected");
    assert_eq!(hello["store"], "memory");

    reqwest::Client::new()
        .post(server.url("/api/preferences/restrictions/toggle"))
        .json(&json!({ "value": "Halal" }))
        .send()
        .await
        .unwrap();

    let change = next_json(&mut socket).await;
    assert_eq!(change["type"], "change");
    assert_eq!(change["key"], "food_preferences");
    let record: Value = serde_json::from_str(change["new_value"].as_str().unwrap()).unwrap();
    assert_eq!(record["restrictions"], json!(["Halal"]));
}

#[tokio::test]
async fn external_change_from_client_resyncs_registry() {
    let server = GatewayTestServer::start(NO_PROVIDER, StoreBackendKind::Memory).await;
    let (mut socket, _) = connect_async(server.ws_url()).await.unwrap();
    next_json(&mut socket).await;

    let external = json!([{ "id": "42", "name": "Tofu", "quantity": 1, "unit": "package" }]);
    let message = json!({
        "type": "change",
        "key": "ingredients",
        "new_value": external.to_string()
    });
    socket
        .send(Message::Text(message.to_string().into()))
        .await
        .unwrap();

    let client = reqwest::Client::new();
    let url = server.url("/api/ingredients");
    let synced = eventually(|| {
        let client = client.clone();
        let url = url.clone();
        async move {
            let list: Vec<Value> = client.get(url).send().await.unwrap().json().await.unwrap();
            list.len() == 1 && list[0]["name"] == "Tofu"
        }
    })
    .await;
    assert!(synced);
}

#[tokio::test]
async fn malformed_external_change_is_ignored() {
    let server = GatewayTestServer::start(NO_PROVIDER, StoreBackendKind::Memory).await;
    let client = reqwest::Client::new();
    client
        .post(server.url("/api/ingredients"))
        .json(&json!({ "name": "Egg", "quantity": 2, "unit": "piece" }))
        .send()
        .await
        .unwrap();

    let (mut socket, _) = connect_async(server.ws_url()).await.unwrap();
    next_json(&mut socket).await;
    let message = json!({ "type": "change", "key": "ingredients", "new_value": "{broken" });
    socket
        .send(Message::Text(message.to_string().into()))
        .await
        .unwrap();

    // The relayed change comes back on the feed once it has been published.
    let echoed = next_json(&mut socket).await;
    assert_eq!(echoed["new_value"], "{broken");

    let list: Vec<Value> = client
        .get(server.url("/api/ingredients"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["name"], "Egg");
}

#[tokio::test]
async fn invalid_client_message_gets_error_reply() {
    let server = GatewayTestServer::start(NO_PROVIDER, StoreBackendKind::Memory).await;
    let (mut socket, _) = connect_async(server.ws_url()).await.unwrap();
    next_json(&mut socket).await;

    socket.send(Message::Text("not json".into())).await.unwrap();
    let reply = next_json(&mut socket).await;
    assert_eq!(reply["type"], "error");

    let bad_key = json!({ "type": "change", "key": "../etc", "new_value": "[]" });
    socket
        .send(Message::Text(bad_key.to_string().into()))
        .await
        .unwrap();
    let reply = next_json(&mut socket).await;
    assert_eq!(reply["type"], "error");
    assert!(reply["message"].as_str().unwrap().contains("invalid storage key"));

    socket
        .send(Message::Text(json!({ "type": "ping" }).to_string().into()))
        .await
        .unwrap();
    assert_eq!(next_json(&mut socket).await["type"], "pong");
}

use super::AppState;
use super::events::{ClientMessage, ServerMessage};
use crate::store::{StoreChange, Subscription, validate_key};
use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;

pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Streams every store change to the client and relays client-reported
/// changes onto the channel.
async fn handle_socket(mut socket: WebSocket, state: AppState) {
    let mut changes = state.pantry.store.subscribe_all();

    let connected = ServerMessage::connected(state.pantry.store.backend_name());
    if send_message(&mut socket, &connected).await.is_err() {
        return;
    }

    loop {
        tokio::select! {
            incoming = socket.recv() => {
                let Some(result) = incoming else { break };
                let message = match result {
                    Ok(message) => message,
                    Err(error) => {
                        tracing::debug!("websocket receive error: {error}");
                        break;
                    }
                };
                if handle_frame(&mut socket, &state, message).await.is_err() {
                    break;
                }
            }
            change = next_change(&mut changes) => {
                let Some(change) = change else { break };
                if send_message(&mut socket, &ServerMessage::from(change)).await.is_err() {
                    break;
                }
            }
        }
    }
}

async fn next_change(changes: &mut Subscription) -> Option<StoreChange> {
    changes.recv().await
}

/// `Err` means the connection should close.
async fn handle_frame(
    socket: &mut WebSocket,
    state: &AppState,
    message: Message,
) -> Result<(), axum::Error> {
    match message {
        Message::Text(text) => match serde_json::from_str::<ClientMessage>(&text) {
            Ok(client_message) => handle_client_message(socket, state, client_message).await,
            Err(error) => {
                send_message(socket, &ServerMessage::error(format!("invalid message: {error}")))
                    .await
            }
        },
        Message::Close(_) => Err(axum::Error::new("client closed")),
        Message::Ping(data) => socket.send(Message::Pong(data)).await,
        _ => Ok(()),
    }
}

async fn handle_client_message(
    socket: &mut WebSocket,
    state: &AppState,
    message: ClientMessage,
) -> Result<(), axum::Error> {
    match message {
        ClientMessage::Change { key, new_value } => {
            if let Err(error) = validate_key(&key) {
                return send_message(socket, &ServerMessage::error(error.to_string())).await;
            }
            let receivers = state
                .pantry
                .store
                .publish(StoreChange::external(key.clone(), new_value));
            tracing::debug!(key, receivers, "relayed external change");
            Ok(())
        }
        ClientMessage::Ping => send_message(socket, &ServerMessage::Pong).await,
    }
}

async fn send_message(socket: &mut WebSocket, message: &ServerMessage) -> Result<(), axum::Error> {
    socket.send(Message::Text(message.to_json().into())).await
}

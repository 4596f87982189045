use crate::store::StoreChange;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Another writer changed `key`; broadcast it without persisting.
    Change { key: String, new_value: String },
    Ping,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    Connected { version: String, store: String },
    Change { key: String, new_value: String },
    Error { message: String },
    Pong,
}

impl ServerMessage {
    pub fn connected(store: &str) -> Self {
        Self::Connected {
            version: env!("CARGO_PKG_VERSION").to_string(),
            store: store.to_string(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|_| r#"{"type":"error","message":"serialization failed"}"#.to_string())
    }
}

impl From<StoreChange> for ServerMessage {
    fn from(change: StoreChange) -> Self {
        Self::Change {
            key: change.key,
            new_value: change.new_value,
        }
    }
}

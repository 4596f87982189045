use crate::error::StoreError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Durable string-to-string blob storage.
///
/// Values are opaque to the backend; the adapter owns (de)serialization.
/// No locking is implied: concurrent writers of one key resolve last-write-wins.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Backend name for logs and `/health`
    fn name(&self) -> &str;

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Returns whether a value was present.
    async fn remove(&self, key: &str) -> Result<bool, StoreError>;

    async fn keys(&self) -> Result<Vec<String>, StoreError>;

    async fn health_check(&self) -> bool {
        self.keys().await.is_ok()
    }
}

/// Notification emitted after a successful write.
///
/// Advisory only: receivers must re-parse `new_value` and drop it when it
/// doesn't match the shape they expect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreChange {
    pub key: String,
    pub new_value: String,
    /// Writer that produced the change. `None` for external sources.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<Uuid>,
}

impl StoreChange {
    pub fn external(key: impl Into<String>, new_value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            new_value: new_value.into(),
            origin: None,
        }
    }

    pub fn is_from(&self, origin: Uuid) -> bool {
        self.origin == Some(origin)
    }
}

/// Keys double as file names for the file backend, so keep them boring.
pub fn validate_key(key: &str) -> Result<(), StoreError> {
    let valid = !key.is_empty()
        && key.len() <= 128
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_string()))
    }
}

use super::traits::{KvStore, StoreChange};
use crate::error::StoreError;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio::sync::broadcast;
use uuid::Uuid;

const CHANGE_CHANNEL_CAPACITY: usize = 64;

/// Parse a stored JSON value, falling back to `default` on absence or garbage.
pub fn parse_or_default<T: DeserializeOwned>(key: &str, raw: Option<&str>, default: T) -> T {
    let Some(raw) = raw else {
        return default;
    };
    match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(error) => {
            tracing::warn!(key, "stored value is not valid JSON for its shape, using default: {error}");
            default
        }
    }
}

/// Typed view over a [`KvStore`] plus the change-notification channel.
///
/// Cheap to clone; clones share the backend and the channel.
#[derive(Clone)]
pub struct StoreAdapter {
    backend: Arc<dyn KvStore>,
    changes: broadcast::Sender<StoreChange>,
}

impl StoreAdapter {
    pub fn new(backend: Arc<dyn KvStore>) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self { backend, changes }
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    pub fn backend(&self) -> &Arc<dyn KvStore> {
        &self.backend
    }

    /// Read `key` as `T`. Never fails: absent keys, unparseable values and
    /// backend read errors all yield `default`.
    pub async fn read<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        match self.backend.get(key).await {
            Ok(raw) => {
                if raw.is_none() {
                    tracing::debug!(key, "no stored value, using default");
                }
                parse_or_default(key, raw.as_deref(), default)
            }
            Err(error) => {
                tracing::warn!(key, backend = self.backend.name(), "store read failed: {error}");
                default
            }
        }
    }

    pub async fn read_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        self.read(key, T::default()).await
    }

    /// Persist `value` under `key` and notify subscribers.
    pub async fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        self.write_with_origin(None, key, value).await
    }

    /// Like [`write`](Self::write) but tags the notification with the writer.
    pub async fn write_from<T: Serialize + ?Sized>(
        &self,
        origin: Uuid,
        key: &str,
        value: &T,
    ) -> Result<(), StoreError> {
        self.write_with_origin(Some(origin), key, value).await
    }

    async fn write_with_origin<T: Serialize + ?Sized>(
        &self,
        origin: Option<Uuid>,
        key: &str,
        value: &T,
    ) -> Result<(), StoreError> {
        let serialized = serde_json::to_string(value).map_err(|error| StoreError::Serialize {
            key: key.to_string(),
            message: error.to_string(),
        })?;

        self.backend.set(key, &serialized).await?;

        self.publish(StoreChange {
            key: key.to_string(),
            new_value: serialized,
            origin,
        });
        Ok(())
    }

    /// Broadcast a change without writing it. Returns the number of receivers.
    pub fn publish(&self, change: StoreChange) -> usize {
        // No receivers is normal (nobody watching); not an error.
        self.changes.send(change).unwrap_or(0)
    }

    /// Subscribe to changes of one key.
    pub fn subscribe(&self, key: &str) -> Subscription {
        Subscription {
            key: Some(key.to_string()),
            rx: self.changes.subscribe(),
        }
    }

    /// Subscribe to changes of every key.
    pub fn subscribe_all(&self) -> Subscription {
        Subscription {
            key: None,
            rx: self.changes.subscribe(),
        }
    }

    /// Remove the given keys from the backend. Returns how many existed.
    ///
    /// No notification is emitted; owners of the keys are expected to reload.
    pub async fn clear(&self, keys: &[&str]) -> Result<usize, StoreError> {
        let mut removed = 0;
        for key in keys {
            if self.backend.remove(key).await? {
                removed += 1;
            }
        }
        tracing::info!(removed, backend = self.backend.name(), "store cleared");
        Ok(removed)
    }
}

/// Receiving half of a (possibly key-filtered) change subscription.
pub struct Subscription {
    key: Option<String>,
    rx: broadcast::Receiver<StoreChange>,
}

impl Subscription {
    /// Next matching change, or `None` once every adapter clone is gone.
    ///
    /// A subscriber that falls behind skips the notifications it missed.
    pub async fn recv(&mut self) -> Option<StoreChange> {
        loop {
            match self.rx.recv().await {
                Ok(change) => {
                    if self.key.as_deref().is_none_or(|key| key == change.key) {
                        return Some(change);
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "store change subscriber lagged");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

//! User-owned pantry state: the ingredient list and dietary preferences.
//!
//! Each registry keeps a typed in-memory projection of one store key and is
//! the only writer of that key.

pub mod catalog;
pub mod ingredients;
pub mod preferences;

pub use ingredients::{INGREDIENTS_KEY, Ingredient, IngredientRegistry, parse_quantity};
pub use preferences::{DietaryPreferences, PREFERENCES_KEY, PreferenceRegistry};

use crate::store::{StoreAdapter, StoreChange};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// A projection that can resynchronize from change notifications.
#[async_trait]
pub trait Resync: Send + Sync + 'static {
    /// Storage key this projection mirrors.
    fn key(&self) -> &'static str;

    /// Apply a foreign change. Returns whether the projection was replaced.
    async fn apply_change(&self, change: &StoreChange) -> bool;
}

/// Spawn a task feeding `registry` every change of its key.
///
/// The task holds only a weak handle and exits on the first change after the
/// registry is dropped, or when the channel closes.
pub fn watch<R: Resync>(registry: &Arc<R>, store: &StoreAdapter) -> JoinHandle<()> {
    let weak = Arc::downgrade(registry);
    let key = registry.key();
    let mut subscription = store.subscribe(key);

    tokio::spawn(async move {
        while let Some(change) = subscription.recv().await {
            let Some(registry) = weak.upgrade() else {
                break;
            };
            if registry.apply_change(&change).await {
                tracing::debug!(key, "resynchronized from external change");
            }
        }
    })
}

/// Both registries over one store, as used by the CLI and the gateway.
#[derive(Clone)]
pub struct Pantry {
    pub store: StoreAdapter,
    pub ingredients: Arc<IngredientRegistry>,
    pub preferences: Arc<PreferenceRegistry>,
}

impl Pantry {
    pub async fn load(store: StoreAdapter) -> Self {
        let ingredients = Arc::new(IngredientRegistry::load(store.clone()).await);
        let preferences = Arc::new(PreferenceRegistry::load(store.clone()).await);
        Self {
            store,
            ingredients,
            preferences,
        }
    }

    /// Start watcher tasks for both registries.
    pub fn watch(&self) -> Vec<JoinHandle<()>> {
        vec![
            watch(&self.ingredients, &self.store),
            watch(&self.preferences, &self.store),
        ]
    }

    /// Wipe both keys and reload the registries to their defaults.
    pub async fn reset(&self) -> Result<usize, crate::error::StoreError> {
        let removed = self.store.clear(&[INGREDIENTS_KEY, PREFERENCES_KEY]).await?;
        self.ingredients.reload().await;
        self.preferences.reload().await;
        Ok(removed)
    }
}

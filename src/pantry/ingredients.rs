use super::{Resync, catalog};
use async_trait::async_trait;
use crate::error::StoreError;
use crate::store::{StoreAdapter, StoreChange};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Storage key holding the JSON array of [`Ingredient`]s.
pub const INGREDIENTS_KEY: &str = "ingredients";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub quantity: f64,
    pub unit: String,
}

impl Ingredient {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        quantity: f64,
        unit: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            quantity,
            unit: unit.into(),
        }
    }
}

/// `"<name> (<quantity> <unit>)"`, quantity in its shortest form.
impl fmt::Display for Ingredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} {})", self.name, self.quantity, self.unit)
    }
}

/// Parse user-typed quantity text. Only finite, non-negative numbers pass.
pub fn parse_quantity(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|q| q.is_finite() && *q >= 0.0)
        // Folds "-0" into 0 so it never prints with a sign.
        .map(|q| q + 0.0)
}

/// Millisecond timestamp id, bumped past any id already taken.
fn next_id(existing: &[Ingredient]) -> String {
    let mut candidate = Utc::now().timestamp_millis();
    loop {
        let id = candidate.to_string();
        if existing.iter().all(|item| item.id != id) {
            return id;
        }
        candidate += 1;
    }
}

/// Ordered, store-backed list of ingredients on hand.
///
/// Every mutation rewrites the whole list under [`INGREDIENTS_KEY`].
/// Duplicate names are kept as separate entries.
pub struct IngredientRegistry {
    store: StoreAdapter,
    origin: Uuid,
    items: RwLock<Vec<Ingredient>>,
}

impl IngredientRegistry {
    pub async fn load(store: StoreAdapter) -> Self {
        let items: Vec<Ingredient> = store.read_or_default(INGREDIENTS_KEY).await;
        tracing::debug!(count = items.len(), "ingredient registry loaded");
        Self {
            store,
            origin: Uuid::new_v4(),
            items: RwLock::new(items),
        }
    }

    pub async fn list(&self) -> Vec<Ingredient> {
        self.items.read().await.clone()
    }

    /// Owned copy taken at submission time, detached from later edits.
    pub async fn snapshot(&self) -> Vec<Ingredient> {
        self.list().await
    }

    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }

    /// Validate and append a new ingredient.
    ///
    /// Returns `Ok(None)` without touching state when the name or unit is
    /// blank or the quantity isn't a finite number >= 0.
    pub async fn add(
        &self,
        name: &str,
        quantity_text: &str,
        unit: &str,
    ) -> Result<Option<Ingredient>, StoreError> {
        let name = name.trim();
        let unit = unit.trim();
        let Some(quantity) = parse_quantity(quantity_text) else {
            tracing::debug!(quantity_text, "rejected ingredient with invalid quantity");
            return Ok(None);
        };
        if name.is_empty() || unit.is_empty() {
            tracing::debug!("rejected ingredient with blank name or unit");
            return Ok(None);
        }

        let mut items = self.items.write().await;
        let ingredient = Ingredient::new(next_id(&items), name, quantity, unit);
        let mut updated = items.clone();
        updated.push(ingredient.clone());

        self.store
            .write_from(self.origin, INGREDIENTS_KEY, &updated)
            .await?;
        *items = updated;

        tracing::info!(id = %ingredient.id, name = %ingredient.name, "ingredient added");
        Ok(Some(ingredient))
    }

    /// Remove by position. Out-of-range indexes are a silent no-op.
    pub async fn remove(&self, index: usize) -> Result<Option<Ingredient>, StoreError> {
        let mut items = self.items.write().await;
        if index >= items.len() {
            return Ok(None);
        }

        let mut updated = items.clone();
        let removed = updated.remove(index);

        self.store
            .write_from(self.origin, INGREDIENTS_KEY, &updated)
            .await?;
        *items = updated;

        tracing::info!(id = %removed.id, name = %removed.name, "ingredient removed");
        Ok(Some(removed))
    }

    pub fn suggest(partial: &str) -> Vec<&'static str> {
        catalog::suggest(partial)
    }

    /// Re-read the persisted list, e.g. after the store was cleared.
    pub async fn reload(&self) {
        let fresh: Vec<Ingredient> = self.store.read_or_default(INGREDIENTS_KEY).await;
        *self.items.write().await = fresh;
    }
}

#[async_trait]
impl Resync for IngredientRegistry {
    fn key(&self) -> &'static str {
        INGREDIENTS_KEY
    }

    async fn apply_change(&self, change: &StoreChange) -> bool {
        if change.key != INGREDIENTS_KEY || change.is_from(self.origin) {
            return false;
        }
        match serde_json::from_str::<Vec<Ingredient>>(&change.new_value) {
            Ok(fresh) => {
                *self.items.write().await = fresh;
                true
            }
            Err(error) => {
                tracing::debug!("ignoring malformed ingredients notification: {error}");
                false
            }
        }
    }
}

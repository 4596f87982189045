use super::Resync;
use crate::error::StoreError;
use crate::store::{StoreAdapter, StoreChange};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Storage key holding the JSON [`DietaryPreferences`] record.
pub const PREFERENCES_KEY: &str = "food_preferences";

/// Always-present preferences record.
///
/// Missing fields in stored JSON fall back to empty values, so older or
/// partial records still load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DietaryPreferences {
    pub restrictions: Vec<String>,
    /// Cuisine preferences.
    pub preferences: Vec<String>,
    pub additional_notes: String,
}

impl DietaryPreferences {
    pub fn has_any(&self) -> bool {
        !self.restrictions.is_empty()
            || !self.preferences.is_empty()
            || !self.additional_notes.trim().is_empty()
    }

    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if !self.restrictions.is_empty() {
            parts.push(format!("Restrictions: {}", self.restrictions.join(", ")));
        }
        if !self.preferences.is_empty() {
            parts.push(format!("Preferences: {}", self.preferences.join(", ")));
        }
        if !self.additional_notes.trim().is_empty() {
            parts.push(format!("Notes: {}", self.additional_notes));
        }

        if parts.is_empty() {
            "No dietary preferences set".to_string()
        } else {
            parts.join(" • ")
        }
    }
}

/// Remove `value` if present, else append it. Returns whether it is now present.
fn toggle(list: &mut Vec<String>, value: &str) -> bool {
    if let Some(position) = list.iter().position(|item| item == value) {
        list.remove(position);
        false
    } else {
        list.push(value.to_string());
        true
    }
}

struct PreferenceState {
    saved: DietaryPreferences,
    notes_draft: String,
}

impl PreferenceState {
    fn new(saved: DietaryPreferences) -> Self {
        let notes_draft = saved.additional_notes.clone();
        Self { saved, notes_draft }
    }

    fn replace(&mut self, saved: DietaryPreferences) {
        if saved.additional_notes != self.saved.additional_notes {
            self.notes_draft.clone_from(&saved.additional_notes);
        }
        self.saved = saved;
    }
}

/// Store-backed dietary preferences with an uncommitted notes draft.
pub struct PreferenceRegistry {
    store: StoreAdapter,
    origin: Uuid,
    state: RwLock<PreferenceState>,
}

impl PreferenceRegistry {
    pub async fn load(store: StoreAdapter) -> Self {
        let saved: DietaryPreferences = store.read_or_default(PREFERENCES_KEY).await;
        Self {
            store,
            origin: Uuid::new_v4(),
            state: RwLock::new(PreferenceState::new(saved)),
        }
    }

    pub async fn snapshot(&self) -> DietaryPreferences {
        self.state.read().await.saved.clone()
    }

    pub async fn has_any(&self) -> bool {
        self.state.read().await.saved.has_any()
    }

    pub async fn summary(&self) -> String {
        self.state.read().await.saved.summary()
    }

    pub async fn toggle_restriction(&self, value: &str) -> Result<DietaryPreferences, StoreError> {
        self.mutate(|prefs| {
            let added = toggle(&mut prefs.restrictions, value);
            tracing::info!(value, added, "dietary restriction toggled");
        })
        .await
    }

    pub async fn toggle_preference(&self, value: &str) -> Result<DietaryPreferences, StoreError> {
        self.mutate(|prefs| {
            let added = toggle(&mut prefs.preferences, value);
            tracing::info!(value, added, "cuisine preference toggled");
        })
        .await
    }

    /// Replace the notes verbatim. No trimming.
    pub async fn set_notes(&self, text: &str) -> Result<DietaryPreferences, StoreError> {
        self.mutate(|prefs| text.clone_into(&mut prefs.additional_notes))
            .await
    }

    /// Update the draft only; nothing is persisted until [`commit_notes`](Self::commit_notes).
    pub async fn edit_notes(&self, text: &str) {
        text.clone_into(&mut self.state.write().await.notes_draft);
    }

    pub async fn notes_draft(&self) -> String {
        self.state.read().await.notes_draft.clone()
    }

    pub async fn commit_notes(&self) -> Result<DietaryPreferences, StoreError> {
        let draft = self.notes_draft().await;
        self.set_notes(&draft).await
    }

    pub async fn reload(&self) {
        let fresh: DietaryPreferences = self.store.read_or_default(PREFERENCES_KEY).await;
        self.state.write().await.replace(fresh);
    }

    async fn mutate<F>(&self, edit: F) -> Result<DietaryPreferences, StoreError>
    where
        F: FnOnce(&mut DietaryPreferences),
    {
        let mut state = self.state.write().await;
        let mut updated = state.saved.clone();
        edit(&mut updated);

        self.store
            .write_from(self.origin, PREFERENCES_KEY, &updated)
            .await?;
        state.replace(updated.clone());
        Ok(updated)
    }
}

#[async_trait]
impl Resync for PreferenceRegistry {
    fn key(&self) -> &'static str {
        PREFERENCES_KEY
    }

    async fn apply_change(&self, change: &StoreChange) -> bool {
        if change.key != PREFERENCES_KEY || change.is_from(self.origin) {
            return false;
        }
        match serde_json::from_str::<DietaryPreferences>(&change.new_value) {
            Ok(fresh) => {
                self.state.write().await.replace(fresh);
                true
            }
            Err(error) => {
                tracing::debug!("ignoring malformed preferences notification: {error}");
                false
            }
        }
    }
}

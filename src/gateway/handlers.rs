use super::AppState;
use crate::error::RecipeError;
use crate::pantry::{DietaryPreferences, Ingredient, IngredientRegistry, catalog, parse_quantity};
use axum::{
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

pub(super) const INVALID_INGREDIENTS: &str = "Please provide a valid list of ingredients";
pub(super) const GENERATION_FAILED: &str = "Failed to generate recipe";
const EMPTY_PANTRY: &str = "Please add some ingredients to your inventory first";
const SAVE_FAILED: &str = "Failed to save changes";

type JsonResponse = (StatusCode, Json<Value>);

fn error(status: StatusCode, message: impl Into<String>) -> JsonResponse {
    (status, Json(json!({ "error": message.into() })))
}

/// Quantities arrive as numbers from scripts and as text from form fields.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum QuantityInput {
    Number(f64),
    Text(String),
}

impl QuantityInput {
    fn as_text(&self) -> String {
        match self {
            Self::Number(value) => value.to_string(),
            Self::Text(text) => text.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct IngredientBody {
    #[serde(default)]
    id: Option<String>,
    name: String,
    quantity: QuantityInput,
    unit: String,
}

impl IngredientBody {
    /// Same rules the registry applies on `add`.
    fn into_ingredient(self) -> Option<Ingredient> {
        let quantity = parse_quantity(&self.quantity.as_text())?;
        let name = self.name.trim();
        let unit = self.unit.trim();
        if name.is_empty() || unit.is_empty() {
            return None;
        }
        Some(Ingredient::new(self.id.unwrap_or_default(), name, quantity, unit))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct GenerateRecipeBody {
    #[serde(default)]
    ingredients: Option<Vec<IngredientBody>>,
    #[serde(default)]
    dietary_preferences: Option<DietaryPreferences>,
}

#[derive(Debug, Deserialize)]
pub(super) struct SuggestQuery {
    #[serde(default)]
    q: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct ToggleBody {
    value: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct NotesBody {
    notes: String,
}

#[derive(Debug, Serialize)]
struct PreferencesView {
    #[serde(flatten)]
    preferences: DietaryPreferences,
    summary: String,
}

fn preferences_view(preferences: DietaryPreferences) -> Value {
    let summary = preferences.summary();
    let view = PreferencesView {
        preferences,
        summary,
    };
    json!(view)
}

/// GET /health
pub(super) async fn handle_health(State(state): State<AppState>) -> impl IntoResponse {
    let store = state.pantry.store.backend();
    Json(json!({
        "status": "ok",
        "store": store.name(),
        "store_healthy": store.health_check().await,
        "ingredients": state.pantry.ingredients.len().await,
        "recipe_in_flight": state.desk.is_busy(),
    }))
}

/// POST /api/generate-recipe: stateless, everything comes from the body.
pub(super) async fn handle_generate_recipe(
    State(state): State<AppState>,
    body: Result<Json<GenerateRecipeBody>, JsonRejection>,
) -> impl IntoResponse {
    let Ok(Json(body)) = body else {
        return error(StatusCode::BAD_REQUEST, INVALID_INGREDIENTS);
    };
    let Some(ingredients) = body
        .ingredients
        .filter(|list| !list.is_empty())
        .and_then(|list| {
            list.into_iter()
                .map(IngredientBody::into_ingredient)
                .collect::<Option<Vec<_>>>()
        })
    else {
        return error(StatusCode::BAD_REQUEST, INVALID_INGREDIENTS);
    };
    let preferences = body.dietary_preferences.unwrap_or_default();

    match state.pipeline.generate(&ingredients, &preferences).await {
        Ok(result) => (StatusCode::OK, Json(json!({ "recipe": result.raw_text }))),
        Err(RecipeError::NoIngredients) => error(StatusCode::BAD_REQUEST, INVALID_INGREDIENTS),
        Err(err) => {
            tracing::error!("Error generating recipe: {err}");
            error(StatusCode::INTERNAL_SERVER_ERROR, GENERATION_FAILED)
        }
    }
}

/// GET /api/ingredients
pub(super) async fn handle_list_ingredients(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!(state.pantry.ingredients.list().await))
}

/// POST /api/ingredients
pub(super) async fn handle_add_ingredient(
    State(state): State<AppState>,
    body: Result<Json<IngredientBody>, JsonRejection>,
) -> impl IntoResponse {
    let Json(body) = match body {
        Ok(body) => body,
        Err(e) => {
            return error(
                StatusCode::BAD_REQUEST,
                format!("Invalid JSON: {e}. Expected: {{\"name\", \"quantity\", \"unit\"}}"),
            );
        }
    };

    match state
        .pantry
        .ingredients
        .add(&body.name, &body.quantity.as_text(), &body.unit)
        .await
    {
        Ok(Some(ingredient)) => (StatusCode::CREATED, Json(json!(ingredient))),
        Ok(None) => error(
            StatusCode::BAD_REQUEST,
            "An ingredient needs a name, a unit and a quantity of zero or more",
        ),
        Err(err) => {
            tracing::error!("failed to persist ingredients: {err}");
            error(StatusCode::INTERNAL_SERVER_ERROR, SAVE_FAILED)
        }
    }
}

/// DELETE /api/ingredients/{index}
pub(super) async fn handle_remove_ingredient(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> impl IntoResponse {
    match state.pantry.ingredients.remove(index).await {
        Ok(Some(removed)) => (StatusCode::OK, Json(json!(removed))),
        Ok(None) => error(StatusCode::NOT_FOUND, format!("No ingredient at index {index}")),
        Err(err) => {
            tracing::error!("failed to persist ingredients: {err}");
            error(StatusCode::INTERNAL_SERVER_ERROR, SAVE_FAILED)
        }
    }
}

/// GET /api/ingredients/suggest?q=
pub(super) async fn handle_suggest(Query(query): Query<SuggestQuery>) -> impl IntoResponse {
    Json(json!({ "suggestions": IngredientRegistry::suggest(&query.q) }))
}

/// GET /api/preferences
pub(super) async fn handle_get_preferences(State(state): State<AppState>) -> impl IntoResponse {
    Json(preferences_view(state.pantry.preferences.snapshot().await))
}

/// POST /api/preferences/restrictions/toggle
pub(super) async fn handle_toggle_restriction(
    State(state): State<AppState>,
    body: Result<Json<ToggleBody>, JsonRejection>,
) -> impl IntoResponse {
    let Ok(Json(body)) = body else {
        return error(StatusCode::BAD_REQUEST, "Expected: {\"value\": \"...\"}");
    };
    preferences_result(state.pantry.preferences.toggle_restriction(&body.value).await)
}

/// POST /api/preferences/cuisines/toggle
pub(super) async fn handle_toggle_cuisine(
    State(state): State<AppState>,
    body: Result<Json<ToggleBody>, JsonRejection>,
) -> impl IntoResponse {
    let Ok(Json(body)) = body else {
        return error(StatusCode::BAD_REQUEST, "Expected: {\"value\": \"...\"}");
    };
    preferences_result(state.pantry.preferences.toggle_preference(&body.value).await)
}

/// PUT /api/preferences/notes
pub(super) async fn handle_set_notes(
    State(state): State<AppState>,
    body: Result<Json<NotesBody>, JsonRejection>,
) -> impl IntoResponse {
    let Ok(Json(body)) = body else {
        return error(StatusCode::BAD_REQUEST, "Expected: {\"notes\": \"...\"}");
    };
    preferences_result(state.pantry.preferences.set_notes(&body.notes).await)
}

/// GET /api/preferences/notes/draft
pub(super) async fn handle_get_notes_draft(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({ "draft": state.pantry.preferences.notes_draft().await }))
}

/// PUT /api/preferences/notes/draft: edit without persisting.
pub(super) async fn handle_edit_notes_draft(
    State(state): State<AppState>,
    body: Result<Json<NotesBody>, JsonRejection>,
) -> impl IntoResponse {
    let Ok(Json(body)) = body else {
        return error(StatusCode::BAD_REQUEST, "Expected: {\"notes\": \"...\"}");
    };
    state.pantry.preferences.edit_notes(&body.notes).await;
    (StatusCode::OK, Json(json!({ "draft": body.notes })))
}

/// POST /api/preferences/notes/commit: persist the current draft.
pub(super) async fn handle_commit_notes(State(state): State<AppState>) -> impl IntoResponse {
    preferences_result(state.pantry.preferences.commit_notes().await)
}

fn preferences_result(
    result: Result<DietaryPreferences, crate::error::StoreError>,
) -> JsonResponse {
    match result {
        Ok(preferences) => (StatusCode::OK, Json(preferences_view(preferences))),
        Err(err) => {
            tracing::error!("failed to persist preferences: {err}");
            error(StatusCode::INTERNAL_SERVER_ERROR, SAVE_FAILED)
        }
    }
}

/// POST /api/recipes: generate from the stored pantry.
pub(super) async fn handle_generate_from_pantry(State(state): State<AppState>) -> impl IntoResponse {
    let ingredients = state.pantry.ingredients.snapshot().await;
    let preferences = state.pantry.preferences.snapshot().await;

    match state.desk.try_generate(ingredients, preferences).await {
        Ok(result) => (StatusCode::OK, Json(json!(result))),
        Err(RecipeError::NoIngredients) => error(StatusCode::BAD_REQUEST, EMPTY_PANTRY),
        Err(RecipeError::Busy) => error(
            StatusCode::CONFLICT,
            "A recipe is already being generated. Try again when it finishes.",
        ),
        Err(err) => {
            tracing::error!("Error generating recipe: {err}");
            error(StatusCode::INTERNAL_SERVER_ERROR, GENERATION_FAILED)
        }
    }
}

/// GET /api/catalog
pub(super) async fn handle_catalog() -> impl IntoResponse {
    Json(json!({
        "ingredients": catalog::COMMON_INGREDIENTS,
        "units": catalog::COMMON_UNITS,
        "restrictions": catalog::DIETARY_RESTRICTIONS,
        "cuisines": catalog::CUISINE_PREFERENCES,
    }))
}

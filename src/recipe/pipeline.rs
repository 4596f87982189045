use super::format::{DisplayBlock, format_recipe};
use super::prompt::build_prompt;
use crate::error::RecipeError;
use crate::pantry::{DietaryPreferences, Ingredient};
use crate::providers::{GenerationParams, Provider, sanitize_api_error};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipeResult {
    /// Provider text, unmodified.
    #[serde(rename = "recipe")]
    pub raw_text: String,
    pub blocks: Vec<DisplayBlock>,
}

impl RecipeResult {
    pub fn from_text(raw_text: String) -> Self {
        let blocks = format_recipe(&raw_text);
        Self { raw_text, blocks }
    }
}

/// Builds the prompt, makes exactly one provider call, formats the reply.
#[derive(Clone)]
pub struct RecipePipeline {
    provider: Arc<dyn Provider>,
    params: GenerationParams,
}

impl RecipePipeline {
    pub fn new(provider: Arc<dyn Provider>, params: GenerationParams) -> Self {
        Self { provider, params }
    }

    pub fn params(&self) -> &GenerationParams {
        &self.params
    }

    pub async fn generate(
        &self,
        ingredients: &[Ingredient],
        preferences: &DietaryPreferences,
    ) -> Result<RecipeResult, RecipeError> {
        if ingredients.is_empty() {
            return Err(RecipeError::NoIngredients);
        }

        let prompt = build_prompt(ingredients, preferences);
        tracing::info!(
            provider = self.provider.name(),
            model = %self.params.model,
            ingredients = ingredients.len(),
            "requesting recipe"
        );

        let text = self
            .provider
            .chat(&prompt, &self.params)
            .await
            .map_err(|error| RecipeError::GenerationFailed(sanitize_api_error(&format!("{error:#}"))))?;

        if text.trim().is_empty() {
            return Err(RecipeError::GenerationFailed(format!(
                "{} returned an empty recipe",
                self.provider.name()
            )));
        }

        Ok(RecipeResult::from_text(text))
    }
}

use crate::pantry::{DietaryPreferences, Ingredient};

/// `"Egg (2 piece), Flour (500 g)"`
pub fn ingredient_clause(ingredients: &[Ingredient]) -> String {
    ingredients
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Newline-prefixed lines for each non-empty preference field.
///
/// Empty when nothing is set, which drops the whole dietary paragraph.
pub fn dietary_block(preferences: &DietaryPreferences) -> String {
    let mut block = String::new();
    if !preferences.restrictions.is_empty() {
        block.push_str("\nDietary Restrictions: ");
        block.push_str(&preferences.restrictions.join(", "));
    }
    if !preferences.preferences.is_empty() {
        block.push_str("\nCuisine Preferences: ");
        block.push_str(&preferences.preferences.join(", "));
    }
    if !preferences.additional_notes.trim().is_empty() {
        block.push_str("\nAdditional Notes: ");
        block.push_str(&preferences.additional_notes);
    }
    block
}

pub fn build_prompt(ingredients: &[Ingredient], preferences: &DietaryPreferences) -> String {
    let mut prompt = format!(
        "Generate a recipe using some or all of these ingredients: {}.\n",
        ingredient_clause(ingredients)
    );

    let dietary = dietary_block(preferences);
    if !dietary.is_empty() {
        prompt.push_str("\nPlease consider the following dietary information:");
        prompt.push_str(&dietary);
        prompt.push('\n');
    }

    prompt.push_str(
        "\nThe recipe should include:\n\
         1. A creative name for the dish\n\
         2. A brief description\n\
         3. List of ingredients with measurements\n\
         4. Step-by-step cooking instructions\n\
         5. Approximate cooking time\n\
         6. Difficulty level (Easy, Medium, Hard)\n\
         7. Number of servings\n\
         \n\
         Format the response in a structured way that's easy to read.",
    );
    prompt
}

//! Terminal rendering for CLI output.

use crate::pantry::{DietaryPreferences, Ingredient};
use crate::recipe::{BlockKind, DisplayBlock};
use crate::ui::style;

pub fn ingredient_list(ingredients: &[Ingredient]) -> String {
    if ingredients.is_empty() {
        return style::dim("No ingredients yet. Add one with `larder ingredients add <name> <quantity> <unit>`.");
    }
    ingredients
        .iter()
        .enumerate()
        .map(|(index, ingredient)| {
            format!(
                "{} {} {}",
                style::accent(format!("[{index}]")),
                style::value(&ingredient.name),
                style::dim(format!("{} {}", ingredient.quantity, ingredient.unit)),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn preferences(preferences: &DietaryPreferences) -> String {
    fn list(items: &[String]) -> String {
        if items.is_empty() {
            style::dim("none")
        } else {
            style::value(items.join(", "))
        }
    }

    let notes = if preferences.additional_notes.trim().is_empty() {
        style::dim("none")
    } else {
        style::value(&preferences.additional_notes)
    };

    format!(
        "{} {}\n{} {}\n{} {}",
        style::cyan("Restrictions:"),
        list(&preferences.restrictions),
        style::cyan("Cuisines:    "),
        list(&preferences.preferences),
        style::cyan("Notes:       "),
        notes,
    )
}

pub fn recipe_block(block: &DisplayBlock) -> String {
    match block.kind {
        BlockKind::Header => style::header(&block.text),
        BlockKind::Step => format!("  {}", style::accent(&block.text)),
        BlockKind::Blank => String::new(),
        BlockKind::Paragraph => block.text.clone(),
    }
}

pub fn recipe(blocks: &[DisplayBlock]) -> String {
    blocks.iter().map(recipe_block).collect::<Vec<_>>().join("\n")
}

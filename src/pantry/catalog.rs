//! Static reference vocabularies for autocomplete and preference toggles.

/// Common ingredient names, grouped alphabetically.
pub const COMMON_INGREDIENTS: &[&str] = &[
    // A
    "Apple",
    "Avocado",
    "Almond",
    "Asparagus",
    "Artichoke",
    // B
    "Banana",
    "Bacon",
    "Basil",
    "Beef",
    "Broccoli",
    "Butter",
    "Black pepper",
    "Brown sugar",
    "Bread",
    "Bell pepper",
    // C
    "Carrot",
    "Chicken",
    "Cinnamon",
    "Cheese",
    "Cilantro",
    "Cucumber",
    "Corn",
    "Coconut milk",
    "Chocolate",
    "Cumin",
    // D
    "Dill",
    "Dates",
    // E
    "Egg",
    "Eggplant",
    // F
    "Flour",
    "Fish",
    "Feta cheese",
    // G
    "Garlic",
    "Ginger",
    "Grapes",
    "Green beans",
    "Greek yogurt",
    // H
    "Honey",
    "Ham",
    // J
    "Jalapeño",
    // K
    "Kale",
    "Ketchup",
    // L
    "Lemon",
    "Lime",
    "Lettuce",
    "Lentils",
    // M
    "Milk",
    "Mushroom",
    "Mango",
    "Mustard",
    "Maple syrup",
    "Mint",
    // N
    "Nutmeg",
    "Nuts",
    // O
    "Olive oil",
    "Onion",
    "Oregano",
    "Oats",
    "Orange",
    // P
    "Potato",
    "Pasta",
    "Parsley",
    "Parmesan cheese",
    "Peanut butter",
    "Pork",
    "Peas",
    "Paprika",
    "Pineapple",
    // Q
    "Quinoa",
    // R
    "Rice",
    "Rosemary",
    "Red pepper flakes",
    // S
    "Salt",
    "Sugar",
    "Spinach",
    "Soy sauce",
    "Strawberry",
    "Salmon",
    "Shrimp",
    "Sweet potato",
    // T
    "Tomato",
    "Thyme",
    "Turkey",
    "Tofu",
    // V
    "Vanilla extract",
    "Vinegar",
    // W
    "Water",
    "White wine",
    // Y
    "Yogurt",
    // Z
    "Zucchini",
];

pub const COMMON_UNITS: &[&str] = &[
    "g", "kg", "oz", "lb", "ml", "l", "cup", "tbsp", "tsp", "piece", "slice", "whole", "clove",
    "bunch", "can", "package", "pinch",
];

pub const DIETARY_RESTRICTIONS: &[&str] = &[
    "Vegetarian",
    "Vegan",
    "Gluten-Free",
    "Dairy-Free",
    "Nut-Free",
    "Shellfish-Free",
    "Kosher",
    "Halal",
    "Low-Carb",
    "Keto",
    "Paleo",
];

pub const CUISINE_PREFERENCES: &[&str] = &[
    "Italian",
    "Mexican",
    "Asian",
    "Mediterranean",
    "Indian",
    "American",
    "French",
    "Middle Eastern",
    "Thai",
    "Japanese",
    "Chinese",
    "Greek",
    "Spanish",
];

/// Case-insensitive substring matches of `partial`, in list order.
///
/// An empty query hides suggestions entirely rather than matching everything.
pub fn suggest(partial: &str) -> Vec<&'static str> {
    if partial.is_empty() {
        return Vec::new();
    }
    let needle = partial.to_lowercase();
    COMMON_INGREDIENTS
        .iter()
        .copied()
        .filter(|name| name.to_lowercase().contains(&needle))
        .collect()
}

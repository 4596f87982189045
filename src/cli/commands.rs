use clap::{Parser, Subcommand};

/// Larder - keep track of what's in the pantry and cook something from it.
#[derive(Parser, Debug)]
#[command(name = "larder")]
#[command(version)]
#[command(about = "Track ingredients on hand and generate recipes from them.", long_about = None)]
pub struct Cli {
    /// Log at debug level regardless of config
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP gateway (REST API + websocket change feed)
    Serve {
        /// Host to bind to (default from config: 127.0.0.1)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (use 0 for random available port)
        #[arg(short, long)]
        port: Option<u16>,

        /// Keep all state in memory; nothing is written to disk
        #[arg(long)]
        ephemeral: bool,
    },

    /// Manage the ingredients on hand
    Ingredients {
        #[command(subcommand)]
        command: IngredientCommands,
    },

    /// Manage dietary restrictions, cuisine preferences and notes
    Prefs {
        #[command(subcommand)]
        command: PrefsCommands,
    },

    /// Generate a recipe from the stored ingredients and preferences
    Recipe {
        /// Print the provider's text without formatting
        #[arg(long)]
        raw: bool,
    },

    /// Show the built-in ingredient, unit, restriction and cuisine lists
    Catalog,

    /// Delete every stored ingredient and preference
    Reset {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum IngredientCommands {
    /// List stored ingredients with their index
    List,

    /// Add an ingredient
    Add {
        name: String,
        /// Amount, e.g. 2 or 0.5
        quantity: String,
        /// Unit, e.g. g, cup, piece
        unit: String,
    },

    /// Remove the ingredient at INDEX (as shown by `list`)
    Remove { index: usize },

    /// Suggest common ingredient names containing PARTIAL
    Suggest { partial: String },
}

#[derive(Subcommand, Debug)]
pub enum PrefsCommands {
    /// Show current preferences
    Show,

    /// Toggle a dietary restriction (e.g. Vegan)
    Restrict { value: String },

    /// Toggle a cuisine preference (e.g. Thai)
    Cuisine { value: String },

    /// Replace the additional notes (pass "" to clear)
    Notes { text: String },
}

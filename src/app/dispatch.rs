use crate::app::render;
use crate::cli::{Cli, Commands, IngredientCommands, PrefsCommands};
use crate::config::{Config, StoreBackendKind};
use crate::error::{LarderError, LarderResult, RecipeError};
use crate::pantry::{IngredientRegistry, Pantry, catalog};
use crate::providers::{GenerationParams, create_provider};
use crate::recipe::RecipePipeline;
use crate::store::{StoreAdapter, create_store};
use crate::ui::style;
use anyhow::{Result, anyhow, bail};

pub async fn dispatch(cli: Cli, mut config: Config) -> Result<()> {
    match cli.command {
        Commands::Serve {
            host,
            port,
            ephemeral,
        } => {
            if ephemeral {
                config.store.backend = StoreBackendKind::Memory;
            }
            let host = host.unwrap_or_else(|| config.gateway.host.clone());
            let port = port.unwrap_or(config.gateway.port);
            println!(
                "{} http://{host}:{port} {}",
                style::success("Serving on"),
                style::dim(format!("(store: {})", config.store.backend))
            );
            crate::gateway::run_gateway(&host, port, config).await
        }
        Commands::Catalog => {
            print_catalog();
            Ok(())
        }
        Commands::Ingredients { command } => {
            let pantry = open_pantry(&config).await?;
            run_ingredients(&pantry, command).await
        }
        Commands::Prefs { command } => {
            let pantry = open_pantry(&config).await?;
            run_prefs(&pantry, command).await
        }
        Commands::Recipe { raw } => {
            let pantry = open_pantry(&config).await?;
            run_recipe(&pantry, &config, raw)
                .await
                .map_err(explain_recipe_error)
        }
        Commands::Reset { yes } => {
            let pantry = open_pantry(&config).await?;
            run_reset(&pantry, yes).await
        }
    }
}

async fn open_pantry(config: &Config) -> Result<Pantry> {
    let backend = create_store(&config.store, &config.workspace_dir).await?;
    Ok(Pantry::load(StoreAdapter::new(backend)).await)
}

async fn run_ingredients(pantry: &Pantry, command: IngredientCommands) -> Result<()> {
    match command {
        IngredientCommands::List => {
            println!("{}", render::ingredient_list(&pantry.ingredients.list().await));
        }
        IngredientCommands::Add {
            name,
            quantity,
            unit,
        } => match pantry.ingredients.add(&name, &quantity, &unit).await? {
            Some(ingredient) => println!("{} {ingredient}", style::success("Added")),
            None => bail!(
                "Not added: an ingredient needs a name, a unit and a quantity of zero or more (got {quantity:?})"
            ),
        },
        IngredientCommands::Remove { index } => match pantry.ingredients.remove(index).await? {
            Some(removed) => println!("{} {removed}", style::success("Removed")),
            None => bail!(
                "No ingredient at index {index} (have {})",
                pantry.ingredients.len().await
            ),
        },
        IngredientCommands::Suggest { partial } => {
            let suggestions = IngredientRegistry::suggest(&partial);
            if suggestions.is_empty() {
                println!("{}", style::dim("No suggestions"));
            }
            for suggestion in suggestions {
                println!("{suggestion}");
            }
        }
    }
    Ok(())
}

async fn run_prefs(pantry: &Pantry, command: PrefsCommands) -> Result<()> {
    let preferences = match command {
        PrefsCommands::Show => pantry.preferences.snapshot().await,
        PrefsCommands::Restrict { value } => {
            warn_if_unlisted(&value, catalog::DIETARY_RESTRICTIONS);
            pantry.preferences.toggle_restriction(&value).await?
        }
        PrefsCommands::Cuisine { value } => {
            warn_if_unlisted(&value, catalog::CUISINE_PREFERENCES);
            pantry.preferences.toggle_preference(&value).await?
        }
        PrefsCommands::Notes { text } => pantry.preferences.set_notes(&text).await?,
    };
    println!("{}", render::preferences(&preferences));
    Ok(())
}

fn warn_if_unlisted(value: &str, vocabulary: &[&str]) {
    if !vocabulary.contains(&value) {
        println!(
            "{}",
            style::yellow(format!("Note: {value:?} is not in the built-in list (see `larder catalog`)"))
        );
    }
}

async fn run_recipe(pantry: &Pantry, config: &Config, raw: bool) -> LarderResult<()> {
    let ingredients = pantry.ingredients.snapshot().await;
    let preferences = pantry.preferences.snapshot().await;
    if ingredients.is_empty() {
        return Err(RecipeError::NoIngredients.into());
    }

    let summary = if preferences.has_any() {
        preferences.summary()
    } else {
        "No dietary preferences set.".to_string()
    };
    println!(
        "{} {} {}",
        style::dim("Generating with"),
        style::value(format!("{} ingredients", ingredients.len())),
        style::dim(format!("({summary})"))
    );

    let provider = create_provider(config)?;
    let pipeline = RecipePipeline::new(provider, GenerationParams::from_config(config));
    let result = pipeline.generate(&ingredients, &preferences).await?;

    if raw {
        println!("{}", result.raw_text);
    } else {
        println!("\n{}", render::recipe(&result.blocks));
    }
    Ok(())
}

fn explain_recipe_error(error: LarderError) -> anyhow::Error {
    match error {
        LarderError::Recipe(RecipeError::NoIngredients) => anyhow!(
            "Please add some ingredients to your inventory first (`larder ingredients add`)"
        ),
        LarderError::Recipe(RecipeError::GenerationFailed(detail)) => {
            anyhow!("Failed to generate recipe: {detail}")
        }
        other => other.into(),
    }
}

async fn run_reset(pantry: &Pantry, yes: bool) -> Result<()> {
    if !yes {
        let confirmed = dialoguer::Confirm::new()
            .with_prompt("Delete all stored ingredients and preferences?")
            .default(false)
            .interact()?;
        if !confirmed {
            println!("{}", style::dim("Nothing deleted"));
            return Ok(());
        }
    }

    let removed = pantry.reset().await?;
    println!(
        "{} {}",
        style::success("Cleared"),
        style::dim(format!("({removed} stored keys removed, backend: {})", pantry.store.backend_name()))
    );
    Ok(())
}

fn print_catalog() {
    let sections: [(&str, &[&str]); 4] = [
        ("Units", catalog::COMMON_UNITS),
        ("Dietary restrictions", catalog::DIETARY_RESTRICTIONS),
        ("Cuisines", catalog::CUISINE_PREFERENCES),
        ("Common ingredients", catalog::COMMON_INGREDIENTS),
    ];
    for (title, items) in sections {
        println!("{}", style::header(title));
        println!("  {}\n", items.join(", "));
    }
}

//! Recipe request pipeline: prompt construction, one completion call, and
//! formatting of the reply into display blocks.

pub mod desk;
pub mod format;
pub mod pipeline;
pub mod prompt;

pub use desk::RecipeDesk;
pub use format::{BlockKind, DisplayBlock, format_recipe};
pub use pipeline::{RecipePipeline, RecipeResult};
pub use prompt::build_prompt;

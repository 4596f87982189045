use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for Larder.
///
/// Each subsystem defines its own error variant. Library callers can match on
/// these to decide how to respond; internal plumbing keeps using
/// `anyhow::Result` for ad-hoc context chains.
#[derive(Debug, Error)]
pub enum LarderError {
    // ── Config ───────────────────────────────────────────────────────────
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    // ── Store ───────────────────────────────────────────────────────────
    #[error("store: {0}")]
    Store(#[from] StoreError),

    // ── Recipe pipeline ─────────────────────────────────────────────────
    #[error("recipe: {0}")]
    Recipe(#[from] RecipeError),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// ─── Store errors ────────────────────────────────────────────────────────────

/// Failures of the persistence backend.
///
/// Parse failures of stored values never show up here: the adapter absorbs
/// them and hands back the caller's default.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("backend {backend} failed: {message}")]
    Backend { backend: String, message: String },

    #[error("failed to serialize value for key {key}: {message}")]
    Serialize { key: String, message: String },

    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    pub fn backend(backend: &str, error: impl std::fmt::Display) -> Self {
        Self::Backend {
            backend: backend.to_string(),
            message: error.to_string(),
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(error: sqlx::Error) -> Self {
        Self::backend("sqlite", error)
    }
}

// ─── Recipe pipeline errors ─────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum RecipeError {
    /// The pipeline was asked for a recipe with an empty pantry.
    #[error("no ingredients supplied")]
    NoIngredients,

    /// A request through the same desk is still running.
    #[error("a recipe request is already in flight")]
    Busy,

    /// The completion provider failed or returned no text.
    #[error("recipe generation failed: {0}")]
    GenerationFailed(String),
}

// ─── Convenience alias ──────────────────────────────────────────────────────

pub type LarderResult<T> = std::result::Result<T, LarderError>;

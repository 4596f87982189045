use super::pipeline::{RecipePipeline, RecipeResult};
use crate::error::RecipeError;
use crate::pantry::{DietaryPreferences, Ingredient};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Admits at most one recipe request at a time.
///
/// Clones share the same busy flag.
#[derive(Clone)]
pub struct RecipeDesk {
    pipeline: RecipePipeline,
    busy: Arc<AtomicBool>,
}

/// Clears the busy flag when the request finishes, even if it is dropped.
struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl RecipeDesk {
    pub fn new(pipeline: RecipePipeline) -> Self {
        Self {
            pipeline,
            busy: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Run one request with inputs owned by the caller, so later registry
    /// edits cannot reach an in-flight request.
    pub async fn try_generate(
        &self,
        ingredients: Vec<Ingredient>,
        preferences: DietaryPreferences,
    ) -> Result<RecipeResult, RecipeError> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!("recipe request rejected, another one is in flight");
            return Err(RecipeError::Busy);
        }
        let _guard = BusyGuard(Arc::clone(&self.busy));

        self.pipeline.generate(&ingredients, &preferences).await
    }
}

use crate::domain::repository::IngredientRepository;
use crate::domain::types::{Ingredient, MAX_CHAR_FIELD_LEN};
use crate::error::RecipeServiceError;
use crate::usecase::user::{BLANK, REQUIRED, too_long};

// ── ListIngredients ──────────────────────────────────────────────────────────

pub struct ListIngredientsUseCase<R: IngredientRepository> {
    pub repo: R,
}

impl<R: IngredientRepository> ListIngredientsUseCase<R> {
    pub async fn execute(&self, user_id: i32) -> Result<Vec<Ingredient>, RecipeServiceError> {
        self.repo.list(user_id).await
    }
}

// ── UpdateIngredient ─────────────────────────────────────────────────────────

pub struct UpdateIngredientUseCase<R: IngredientRepository> {
    pub repo: R,
}

impl<R: IngredientRepository> UpdateIngredientUseCase<R> {
    /// `name: None` is allowed only for a partial update and leaves the
    /// ingredient as it is.
    pub async fn execute(
        &self,
        user_id: i32,
        id: i32,
        name: Option<String>,
        partial: bool,
    ) -> Result<Ingredient, RecipeServiceError> {
        let name = match name {
            Some(name) => name.trim().to_owned(),
            None if partial => {
                return self
                    .repo
                    .find(user_id, id)
                    .await?
                    .ok_or(RecipeServiceError::IngredientNotFound);
            }
            None => return Err(RecipeServiceError::field("name", REQUIRED)),
        };
        if name.is_empty() {
            return Err(RecipeServiceError::field("name", BLANK));
        }
        if name.chars().count() > MAX_CHAR_FIELD_LEN {
            return Err(RecipeServiceError::field("name", too_long(MAX_CHAR_FIELD_LEN)));
        }
        self.repo
            .rename(user_id, id, &name)
            .await?
            .ok_or(RecipeServiceError::IngredientNotFound)
    }
}

// ── DeleteIngredient ─────────────────────────────────────────────────────────

pub struct DeleteIngredientUseCase<R: IngredientRepository> {
    pub repo: R,
}

impl<R: IngredientRepository> DeleteIngredientUseCase<R> {
    pub async fn execute(&self, user_id: i32, id: i32) -> Result<(), RecipeServiceError> {
        if !self.repo.delete(user_id, id).await? {
            return Err(RecipeServiceError::IngredientNotFound);
        }
        tracing::info!(user_id, ingredient_id = id, "ingredient deleted");
        Ok(())
    }
}

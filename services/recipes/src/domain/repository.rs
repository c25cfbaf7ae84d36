#![allow(async_fn_in_trait)]

use crate::domain::types::{
    Ingredient, NewRecipe, NewUser, Recipe, RecipeChanges, User, UserChanges,
};
use crate::error::RecipeServiceError;

/// Repository for user accounts.
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, RecipeServiceError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RecipeServiceError>;
    /// Insert a user. A duplicate e-mail is a validation error on `email`.
    async fn create(&self, user: &NewUser) -> Result<User, RecipeServiceError>;
    /// Returns `None` if the user does not exist.
    async fn update(
        &self,
        id: i32,
        changes: &UserChanges,
    ) -> Result<Option<User>, RecipeServiceError>;
}

/// Repository for recipes. Every method is scoped to the owner `user_id`;
/// a recipe owned by someone else is reported as absent.
pub trait RecipeRepository: Send + Sync {
    /// Recipes ordered by id descending. With `ingredient_ids`, only recipes
    /// linked to at least one of them, each listed once.
    async fn list(
        &self,
        user_id: i32,
        ingredient_ids: Option<&[i32]>,
    ) -> Result<Vec<Recipe>, RecipeServiceError>;

    async fn find(&self, user_id: i32, id: i32) -> Result<Option<Recipe>, RecipeServiceError>;

    /// Insert a recipe and link its ingredients, creating missing ones.
    async fn create(&self, recipe: &NewRecipe) -> Result<Recipe, RecipeServiceError>;

    async fn update(
        &self,
        user_id: i32,
        id: i32,
        changes: &RecipeChanges,
    ) -> Result<Option<Recipe>, RecipeServiceError>;

    /// Point the recipe at a stored image. Returns `false` if the recipe is absent.
    async fn set_image(
        &self,
        user_id: i32,
        id: i32,
        image: Option<&str>,
    ) -> Result<bool, RecipeServiceError>;

    /// Delete a recipe, returning it so its image can be removed.
    async fn delete(&self, user_id: i32, id: i32) -> Result<Option<Recipe>, RecipeServiceError>;
}

impl<R: RecipeRepository> RecipeRepository for &R {
    async fn list(
        &self,
        user_id: i32,
        ingredient_ids: Option<&[i32]>,
    ) -> Result<Vec<Recipe>, RecipeServiceError> {
        (**self).list(user_id, ingredient_ids).await
    }
    async fn find(&self, user_id: i32, id: i32) -> Result<Option<Recipe>, RecipeServiceError> {
        (**self).find(user_id, id).await
    }
    async fn create(&self, recipe: &NewRecipe) -> Result<Recipe, RecipeServiceError> {
        (**self).create(recipe).await
    }
    async fn update(
        &self,
        user_id: i32,
        id: i32,
        changes: &RecipeChanges,
    ) -> Result<Option<Recipe>, RecipeServiceError> {
        (**self).update(user_id, id, changes).await
    }
    async fn set_image(
        &self,
        user_id: i32,
        id: i32,
        image: Option<&str>,
    ) -> Result<bool, RecipeServiceError> {
        (**self).set_image(user_id, id, image).await
    }
    async fn delete(&self, user_id: i32, id: i32) -> Result<Option<Recipe>, RecipeServiceError> {
        (**self).delete(user_id, id).await
    }
}

/// Repository for ingredients, scoped to the owner `user_id`.
pub trait IngredientRepository: Send + Sync {
    /// Ingredients ordered by name descending.
    async fn list(&self, user_id: i32) -> Result<Vec<Ingredient>, RecipeServiceError>;

    async fn find(&self, user_id: i32, id: i32) -> Result<Option<Ingredient>, RecipeServiceError>;

    async fn rename(
        &self,
        user_id: i32,
        id: i32,
        name: &str,
    ) -> Result<Option<Ingredient>, RecipeServiceError>;

    /// Delete an ingredient. Returns `true` if a row was deleted.
    async fn delete(&self, user_id: i32, id: i32) -> Result<bool, RecipeServiceError>;
}

/// Blob storage for uploaded files, addressed by relative path.
pub trait ImageStorage: Send + Sync {
    async fn save(&self, path: &str, bytes: &[u8]) -> Result<(), RecipeServiceError>;
    /// Remove a stored file. Missing files are not an error.
    async fn delete(&self, path: &str) -> Result<(), RecipeServiceError>;
}

use anyhow::Context as _;
use rust_decimal::Decimal;

use recipe_core::error::FieldErrors;
use recipe_domain::filter::parse_id_list;
use recipe_domain::image::{recipe_image_file_path, validate_image_filename};
use recipe_domain::price::validate_price;

use crate::domain::repository::{ImageStorage, RecipeRepository};
use crate::domain::types::{MAX_CHAR_FIELD_LEN, NewRecipe, Recipe, RecipeChanges};
use crate::error::RecipeServiceError;
use crate::usecase::user::{BLANK, REQUIRED, too_long};

const NEGATIVE: &str = "Ensure this value is greater than or equal to 0.";
const INVALID_IMAGE: &str =
    "Upload a valid image. The file you uploaded was either not an image or a corrupted image.";
const EMPTY_FILE: &str = "The submitted file is empty.";
const NO_FILE: &str = "No file was submitted.";

/// Recipe fields as submitted by a client. `None` means the key was absent.
#[derive(Debug, Clone, Default)]
pub struct RecipeInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub time_minutes: Option<i32>,
    pub price: Option<Decimal>,
    pub link: Option<String>,
    pub ingredients: Option<Vec<String>>,
}

impl RecipeInput {
    /// Validate the input. Unless `partial`, title, time and price are required.
    fn validate(self, partial: bool) -> Result<RecipeChanges, RecipeServiceError> {
        let mut errors = FieldErrors::new();
        if !partial {
            for (field, present) in [
                ("title", self.title.is_some()),
                ("time_minutes", self.time_minutes.is_some()),
                ("price", self.price.is_some()),
            ] {
                if !present {
                    errors.add(field, REQUIRED);
                }
            }
        }

        let title = self.title.map(|t| t.trim().to_owned());
        if let Some(ref title) = title {
            if title.is_empty() {
                errors.add("title", BLANK);
            } else if title.chars().count() > MAX_CHAR_FIELD_LEN {
                errors.add("title", too_long(MAX_CHAR_FIELD_LEN));
            }
        }
        if self.time_minutes.is_some_and(|t| t < 0) {
            errors.add("time_minutes", NEGATIVE);
        }
        let price = match self.price.map(validate_price).transpose() {
            Ok(price) => price,
            Err(e) => {
                errors.add("price", e.to_string());
                None
            }
        };
        let link = self.link.map(|l| l.trim().to_owned());
        if link
            .as_ref()
            .is_some_and(|l| l.chars().count() > MAX_CHAR_FIELD_LEN)
        {
            errors.add("link", too_long(MAX_CHAR_FIELD_LEN));
        }
        let ingredient_names = self
            .ingredients
            .map(|names| dedup_ingredient_names(names, &mut errors));
        errors.into_result()?;

        Ok(RecipeChanges {
            title,
            description: self.description,
            time_minutes: self.time_minutes,
            price,
            link,
            ingredient_names,
        })
    }
}

/// Trim names and drop repeats, keeping first-seen order.
fn dedup_ingredient_names(names: Vec<String>, errors: &mut FieldErrors) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        let name = name.trim();
        if name.is_empty() {
            errors.add("ingredients", BLANK);
        } else if name.chars().count() > MAX_CHAR_FIELD_LEN {
            errors.add("ingredients", too_long(MAX_CHAR_FIELD_LEN));
        } else if !out.iter().any(|n| n == name) {
            out.push(name.to_owned());
        }
    }
    out
}

// ── ListRecipes ──────────────────────────────────────────────────────────────

pub struct ListRecipesUseCase<R: RecipeRepository> {
    pub repo: R,
}

impl<R: RecipeRepository> ListRecipesUseCase<R> {
    /// `ingredients` is the raw comma-separated id filter from the query string.
    pub async fn execute(
        &self,
        user_id: i32,
        ingredients: Option<&str>,
    ) -> Result<Vec<Recipe>, RecipeServiceError> {
        let ids = match ingredients.map(str::trim).filter(|raw| !raw.is_empty()) {
            Some(raw) => Some(
                parse_id_list(raw).map_err(|e| RecipeServiceError::InvalidFilter(e.to_string()))?,
            ),
            None => None,
        };
        self.repo.list(user_id, ids.as_deref()).await
    }
}

// ── GetRecipe ────────────────────────────────────────────────────────────────

pub struct GetRecipeUseCase<R: RecipeRepository> {
    pub repo: R,
}

impl<R: RecipeRepository> GetRecipeUseCase<R> {
    pub async fn execute(&self, user_id: i32, id: i32) -> Result<Recipe, RecipeServiceError> {
        self.repo
            .find(user_id, id)
            .await?
            .ok_or(RecipeServiceError::RecipeNotFound)
    }
}

// ── CreateRecipe ─────────────────────────────────────────────────────────────

pub struct CreateRecipeUseCase<R: RecipeRepository> {
    pub repo: R,
}

impl<R: RecipeRepository> CreateRecipeUseCase<R> {
    pub async fn execute(
        &self,
        user_id: i32,
        input: RecipeInput,
    ) -> Result<Recipe, RecipeServiceError> {
        let changes = input.validate(false)?;
        let recipe = NewRecipe {
            user_id,
            title: changes.title.unwrap_or_default(),
            description: changes.description.unwrap_or_default(),
            time_minutes: changes.time_minutes.unwrap_or_default(),
            price: changes.price.unwrap_or_default(),
            link: changes.link.unwrap_or_default(),
            ingredient_names: changes.ingredient_names.unwrap_or_default(),
        };
        let created = self.repo.create(&recipe).await?;
        tracing::info!(user_id, recipe_id = created.id, "recipe created");
        Ok(created)
    }
}

// ── UpdateRecipe ─────────────────────────────────────────────────────────────

pub struct UpdateRecipeUseCase<R: RecipeRepository> {
    pub repo: R,
}

impl<R: RecipeRepository> UpdateRecipeUseCase<R> {
    pub async fn execute(
        &self,
        user_id: i32,
        id: i32,
        input: RecipeInput,
        partial: bool,
    ) -> Result<Recipe, RecipeServiceError> {
        let changes = input.validate(partial)?;
        if changes.is_empty() {
            return GetRecipeUseCase {
                repo: &self.repo,
            }
            .execute(user_id, id)
            .await;
        }
        self.repo
            .update(user_id, id, &changes)
            .await?
            .ok_or(RecipeServiceError::RecipeNotFound)
    }
}

// ── DeleteRecipe ─────────────────────────────────────────────────────────────

pub struct DeleteRecipeUseCase<R: RecipeRepository, S: ImageStorage> {
    pub repo: R,
    pub storage: S,
}

impl<R: RecipeRepository, S: ImageStorage> DeleteRecipeUseCase<R, S> {
    pub async fn execute(&self, user_id: i32, id: i32) -> Result<(), RecipeServiceError> {
        let recipe = self
            .repo
            .delete(user_id, id)
            .await?
            .ok_or(RecipeServiceError::RecipeNotFound)?;
        if let Some(ref image) = recipe.image {
            remove_image(&self.storage, image).await;
        }
        tracing::info!(user_id, recipe_id = id, "recipe deleted");
        Ok(())
    }
}

/// The row is already gone; a leftover file is only logged.
async fn remove_image<S: ImageStorage>(storage: &S, path: &str) {
    if let Err(e) = storage.delete(path).await {
        tracing::warn!(error = ?e, path, "failed to remove recipe image");
    }
}

// ── UploadRecipeImage ────────────────────────────────────────────────────────

pub struct ImageUpload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

pub struct UploadRecipeImageUseCase<R: RecipeRepository, S: ImageStorage> {
    pub repo: R,
    pub storage: S,
}

impl<R: RecipeRepository, S: ImageStorage> UploadRecipeImageUseCase<R, S> {
    /// Store the image and point the recipe at it. Returns the stored path.
    ///
    /// Ownership is checked before the payload, so a missing or invalid file
    /// on someone else's recipe is still a 404.
    pub async fn execute(
        &self,
        user_id: i32,
        id: i32,
        upload: Option<ImageUpload>,
    ) -> Result<String, RecipeServiceError> {
        let recipe = self
            .repo
            .find(user_id, id)
            .await?
            .ok_or(RecipeServiceError::RecipeNotFound)?;

        let upload = upload.ok_or_else(|| RecipeServiceError::field("image", NO_FILE))?;
        if upload.bytes.is_empty() {
            return Err(RecipeServiceError::field("image", EMPTY_FILE));
        }
        if let Err(e) = validate_image_filename(&upload.filename) {
            return Err(RecipeServiceError::field("image", e.to_string()));
        }
        let ImageUpload { filename, bytes } = upload;
        let (bytes, decoded) = tokio::task::spawn_blocking(move || {
            let decoded = image::load_from_memory(&bytes).map(|_| ());
            (bytes, decoded)
        })
        .await
        .context("image decoding task")?;
        if let Err(e) = decoded {
            tracing::debug!(error = %e, filename = %filename, "rejected image upload");
            return Err(RecipeServiceError::field("image", INVALID_IMAGE));
        }

        let path = recipe_image_file_path(&filename);
        self.storage.save(&path, &bytes).await?;
        match self.repo.set_image(user_id, id, Some(&path)).await {
            Ok(true) => {}
            Ok(false) => {
                remove_image(&self.storage, &path).await;
                return Err(RecipeServiceError::RecipeNotFound);
            }
            Err(e) => {
                remove_image(&self.storage, &path).await;
                return Err(e);
            }
        }
        if let Some(ref previous) = recipe.image {
            remove_image(&self.storage, previous).await;
        }
        tracing::info!(user_id, recipe_id = id, path = %path, "recipe image stored");
        Ok(path)
    }
}

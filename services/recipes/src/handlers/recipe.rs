use axum::{
    Json,
    extract::{Multipart, Query, State, multipart::MultipartRejection},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::types::{Ingredient, Recipe};
use crate::error::RecipeServiceError;
use crate::handlers::{ApiJson, ApiPath};
use crate::handlers::auth::CurrentUser;
use crate::state::AppState;
use crate::usecase::recipe::{
    CreateRecipeUseCase, DeleteRecipeUseCase, GetRecipeUseCase, ImageUpload, ListRecipesUseCase,
    RecipeInput, UpdateRecipeUseCase, UploadRecipeImageUseCase,
};

const IMAGE_FIELD: &str = "image";

#[derive(Serialize)]
pub struct IngredientResponse {
    pub id: i32,
    pub name: String,
}

impl From<Ingredient> for IngredientResponse {
    fn from(ingredient: Ingredient) -> Self {
        Self {
            id: ingredient.id,
            name: ingredient.name,
        }
    }
}

/// List representation: no description or image.
#[derive(Serialize)]
pub struct RecipeResponse {
    pub id: i32,
    pub title: String,
    pub time_minutes: i32,
    pub price: Decimal,
    pub link: String,
    pub ingredients: Vec<IngredientResponse>,
}

impl From<Recipe> for RecipeResponse {
    fn from(recipe: Recipe) -> Self {
        Self {
            id: recipe.id,
            title: recipe.title,
            time_minutes: recipe.time_minutes,
            price: recipe.price,
            link: recipe.link,
            ingredients: recipe.ingredients.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Serialize)]
pub struct RecipeDetailResponse {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub time_minutes: i32,
    pub price: Decimal,
    pub link: String,
    pub image: Option<String>,
    pub ingredients: Vec<IngredientResponse>,
}

impl RecipeDetailResponse {
    fn new(recipe: Recipe, state: &AppState) -> Self {
        Self {
            id: recipe.id,
            title: recipe.title,
            description: recipe.description,
            time_minutes: recipe.time_minutes,
            price: recipe.price,
            link: recipe.link,
            image: recipe.image.as_deref().map(|path| state.media_url_for(path)),
            ingredients: recipe.ingredients.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Deserialize)]
pub struct IngredientRef {
    pub name: String,
}

#[derive(Deserialize)]
pub struct RecipeRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub time_minutes: Option<i32>,
    pub price: Option<Decimal>,
    pub link: Option<String>,
    pub ingredients: Option<Vec<IngredientRef>>,
}

impl From<RecipeRequest> for RecipeInput {
    fn from(body: RecipeRequest) -> Self {
        Self {
            title: body.title,
            description: body.description,
            time_minutes: body.time_minutes,
            price: body.price,
            link: body.link,
            ingredients: body
                .ingredients
                .map(|refs| refs.into_iter().map(|r| r.name).collect()),
        }
    }
}

// ── GET /api/recipe/recipes/ ─────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ListRecipesParams {
    /// Comma-separated ingredient ids, e.g. `1,2`.
    pub ingredients: Option<String>,
}

pub async fn list_recipes(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Query(params): Query<ListRecipesParams>,
) -> Result<Json<Vec<RecipeResponse>>, RecipeServiceError> {
    let usecase = ListRecipesUseCase {
        repo: state.recipe_repo(),
    };
    let recipes = usecase
        .execute(user.id, params.ingredients.as_deref())
        .await?;
    Ok(Json(recipes.into_iter().map(Into::into).collect()))
}

// ── POST /api/recipe/recipes/ ────────────────────────────────────────────────

pub async fn create_recipe(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    ApiJson(body): ApiJson<RecipeRequest>,
) -> Result<(StatusCode, Json<RecipeDetailResponse>), RecipeServiceError> {
    let usecase = CreateRecipeUseCase {
        repo: state.recipe_repo(),
    };
    let recipe = usecase.execute(user.id, body.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(RecipeDetailResponse::new(recipe, &state)),
    ))
}

// ── GET /api/recipe/recipes/{id}/ ────────────────────────────────────────────

pub async fn get_recipe(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<RecipeDetailResponse>, RecipeServiceError> {
    let usecase = GetRecipeUseCase {
        repo: state.recipe_repo(),
    };
    let recipe = usecase.execute(user.id, id).await?;
    Ok(Json(RecipeDetailResponse::new(recipe, &state)))
}

// ── PUT / PATCH /api/recipe/recipes/{id}/ ────────────────────────────────────

pub async fn replace_recipe(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(body): ApiJson<RecipeRequest>,
) -> Result<Json<RecipeDetailResponse>, RecipeServiceError> {
    update_recipe_with(state, user.id, id, body, false).await
}

pub async fn update_recipe(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(body): ApiJson<RecipeRequest>,
) -> Result<Json<RecipeDetailResponse>, RecipeServiceError> {
    update_recipe_with(state, user.id, id, body, true).await
}

async fn update_recipe_with(
    state: AppState,
    user_id: i32,
    id: i32,
    body: RecipeRequest,
    partial: bool,
) -> Result<Json<RecipeDetailResponse>, RecipeServiceError> {
    let usecase = UpdateRecipeUseCase {
        repo: state.recipe_repo(),
    };
    let recipe = usecase.execute(user_id, id, body.into(), partial).await?;
    Ok(Json(RecipeDetailResponse::new(recipe, &state)))
}

// ── DELETE /api/recipe/recipes/{id}/ ─────────────────────────────────────────

pub async fn delete_recipe(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<StatusCode, RecipeServiceError> {
    let usecase = DeleteRecipeUseCase {
        repo: state.recipe_repo(),
        storage: state.storage.clone(),
    };
    usecase.execute(user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── POST /api/recipe/recipes/{id}/upload-image/ ──────────────────────────────

#[derive(Serialize)]
pub struct RecipeImageResponse {
    pub id: i32,
    pub image: String,
}

pub async fn upload_recipe_image(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<RecipeImageResponse>, RecipeServiceError> {
    let mut multipart = multipart?;
    let mut upload: Option<ImageUpload> = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_owned();
        let bytes = field.bytes().await?;
        upload = Some(ImageUpload {
            filename,
            bytes: bytes.to_vec(),
        });
    }

    let usecase = UploadRecipeImageUseCase {
        repo: state.recipe_repo(),
        storage: state.storage.clone(),
    };
    let path = usecase.execute(user.id, id, upload).await?;
    Ok(Json(RecipeImageResponse {
        id,
        image: state.media_url_for(&path),
    }))
}

use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use serde::Deserialize;

use crate::error::RecipeServiceError;
use crate::handlers::{ApiJson, ApiPath};
use crate::handlers::auth::CurrentUser;
use crate::handlers::recipe::IngredientResponse;
use crate::state::AppState;
use crate::usecase::ingredient::{
    DeleteIngredientUseCase, ListIngredientsUseCase, UpdateIngredientUseCase,
};

#[derive(Deserialize)]
pub struct IngredientRequest {
    pub name: Option<String>,
}

// ── GET /api/recipe/ingredients/ ─────────────────────────────────────────────

pub async fn list_ingredients(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<IngredientResponse>>, RecipeServiceError> {
    let usecase = ListIngredientsUseCase {
        repo: state.ingredient_repo(),
    };
    let ingredients = usecase.execute(user.id).await?;
    Ok(Json(ingredients.into_iter().map(Into::into).collect()))
}

// ── PUT / PATCH /api/recipe/ingredients/{id}/ ────────────────────────────────

pub async fn replace_ingredient(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(body): ApiJson<IngredientRequest>,
) -> Result<Json<IngredientResponse>, RecipeServiceError> {
    rename(state, user.id, id, body, false).await
}

pub async fn update_ingredient(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(body): ApiJson<IngredientRequest>,
) -> Result<Json<IngredientResponse>, RecipeServiceError> {
    rename(state, user.id, id, body, true).await
}

async fn rename(
    state: AppState,
    user_id: i32,
    id: i32,
    body: IngredientRequest,
    partial: bool,
) -> Result<Json<IngredientResponse>, RecipeServiceError> {
    let usecase = UpdateIngredientUseCase {
        repo: state.ingredient_repo(),
    };
    let ingredient = usecase.execute(user_id, id, body.name, partial).await?;
    Ok(Json(ingredient.into()))
}

// ── DELETE /api/recipe/ingredients/{id}/ ─────────────────────────────────────

pub async fn delete_ingredient(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<StatusCode, RecipeServiceError> {
    let usecase = DeleteIngredientUseCase {
        repo: state.ingredient_repo(),
    };
    usecase.execute(user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

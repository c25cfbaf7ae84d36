use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use recipe_core::error::FieldErrors;

use crate::domain::types::User;
use crate::error::RecipeServiceError;
use crate::handlers::auth::CurrentUser;
use crate::handlers::{ApiJson, required};
use crate::state::AppState;
use crate::usecase::token::{CreateTokenInput, CreateTokenUseCase};
use crate::usecase::user::{
    CreateUserInput, CreateUserUseCase, UpdateUserInput, UpdateUserUseCase,
};

#[derive(Serialize)]
pub struct UserResponse {
    pub email: String,
    pub name: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            email: user.email,
            name: user.name,
        }
    }
}

/// Shared body of the create and update endpoints. The password is write-only.
#[derive(Deserialize)]
pub struct UserRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
}

// ── POST /api/user/create/ ───────────────────────────────────────────────────

pub async fn create_user(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<UserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), RecipeServiceError> {
    let mut errors = FieldErrors::new();
    let email = required(&mut errors, "email", body.email);
    let password = required(&mut errors, "password", body.password);
    let name = required(&mut errors, "name", body.name);
    errors.into_result()?;

    let usecase = CreateUserUseCase {
        repo: state.user_repo(),
    };
    let user = usecase
        .execute(CreateUserInput {
            email: email.unwrap_or_default(),
            password: password.unwrap_or_default(),
            name: name.unwrap_or_default(),
        })
        .await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

// ── POST /api/user/token/ ────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct TokenRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Serialize)]
pub struct TokenResponse {
    pub token: String,
}

pub async fn create_token(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<TokenRequest>,
) -> Result<Json<TokenResponse>, RecipeServiceError> {
    let mut errors = FieldErrors::new();
    let email = required(&mut errors, "email", body.email);
    let password = required(&mut errors, "password", body.password);
    errors.into_result()?;

    let usecase = CreateTokenUseCase {
        repo: state.user_repo(),
        secret: state.token_secret.clone(),
        ttl_secs: state.token_ttl_secs,
    };
    let issued = usecase
        .execute(CreateTokenInput {
            email: email.unwrap_or_default(),
            password: password.unwrap_or_default(),
        })
        .await?;
    Ok(Json(TokenResponse {
        token: issued.token,
    }))
}

// ── GET /api/user/me/ ────────────────────────────────────────────────────────

pub async fn get_me(CurrentUser(user): CurrentUser) -> Json<UserResponse> {
    Json(user.into())
}

// ── PUT / PATCH /api/user/me/ ────────────────────────────────────────────────

pub async fn replace_me(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    ApiJson(body): ApiJson<UserRequest>,
) -> Result<Json<UserResponse>, RecipeServiceError> {
    update_user(state, user.id, body, false).await
}

pub async fn update_me(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    ApiJson(body): ApiJson<UserRequest>,
) -> Result<Json<UserResponse>, RecipeServiceError> {
    update_user(state, user.id, body, true).await
}

async fn update_user(
    state: AppState,
    user_id: i32,
    body: UserRequest,
    partial: bool,
) -> Result<Json<UserResponse>, RecipeServiceError> {
    let usecase = UpdateUserUseCase {
        repo: state.user_repo(),
    };
    let user = usecase
        .execute(
            user_id,
            UpdateUserInput {
                email: body.email,
                password: body.password,
                name: body.name,
                partial,
            },
        )
        .await?;
    Ok(Json(user.into()))
}

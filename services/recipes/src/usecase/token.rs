use recipe_auth_types::identity::TokenSecret;
use recipe_auth_types::token::{IssuedToken, issue_token};
use recipe_core::error::{AppError, FieldErrors};
use recipe_domain::user::normalize_email;

use crate::domain::repository::UserRepository;
use crate::domain::types::User;
use crate::error::RecipeServiceError;
use crate::usecase::password::verify_password_blocking;
use crate::usecase::user::BLANK;

// ── CreateToken ──────────────────────────────────────────────────────────────

pub struct CreateTokenInput {
    pub email: String,
    pub password: String,
}

pub struct CreateTokenUseCase<R: UserRepository> {
    pub repo: R,
    pub secret: TokenSecret,
    pub ttl_secs: u64,
}

impl<R: UserRepository> CreateTokenUseCase<R> {
    pub async fn execute(&self, input: CreateTokenInput) -> Result<IssuedToken, RecipeServiceError> {
        let email = normalize_email(&input.email);
        let mut errors = FieldErrors::new();
        if email.is_empty() {
            errors.add("email", BLANK);
        }
        if input.password.is_empty() {
            errors.add("password", BLANK);
        }
        errors.into_result()?;

        let user = self
            .repo
            .find_by_email(&email)
            .await?
            .filter(|u| u.is_active)
            .ok_or(RecipeServiceError::InvalidCredentials)?;
        if !verify_password_blocking(input.password, user.password_hash.clone()).await? {
            return Err(RecipeServiceError::InvalidCredentials);
        }
        let issued = issue_token(user.id, self.secret.as_str(), self.ttl_secs)
            .map_err(|e| anyhow::Error::new(e).context("issue token"))?;
        tracing::debug!(user_id = user.id, "token issued");
        Ok(issued)
    }
}

// ── Authenticate ─────────────────────────────────────────────────────────────

/// Resolves the user behind a validated token.
pub struct AuthenticateUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> AuthenticateUseCase<R> {
    pub async fn execute(&self, user_id: i32) -> Result<User, RecipeServiceError> {
        match self.repo.find_by_id(user_id).await? {
            Some(user) if user.is_active => Ok(user),
            _ => Err(AppError::InvalidToken.into()),
        }
    }
}

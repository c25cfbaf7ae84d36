use axum::extract::FromRef;
use sea_orm::DatabaseConnection;

use recipe_auth_types::identity::TokenSecret;

use crate::infra::db::{DbIngredientRepository, DbRecipeRepository, DbUserRepository};
use crate::infra::storage::FsImageStorage;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub storage: FsImageStorage,
    pub token_secret: TokenSecret,
    pub token_ttl_secs: u64,
    /// Prefix for stored file URLs, always wrapped in `/`.
    pub media_url: String,
}

impl AppState {
    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn recipe_repo(&self) -> DbRecipeRepository {
        DbRecipeRepository {
            db: self.db.clone(),
        }
    }

    pub fn ingredient_repo(&self) -> DbIngredientRepository {
        DbIngredientRepository {
            db: self.db.clone(),
        }
    }

    /// Public URL of a stored file.
    pub fn media_url_for(&self, path: &str) -> String {
        format!("{}{path}", self.media_url)
    }
}

impl FromRef<AppState> for TokenSecret {
    fn from_ref(state: &AppState) -> Self {
        state.token_secret.clone()
    }
}

impl FromRef<AppState> for DatabaseConnection {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use recipe_auth_types::identity::TokenIdentity;

use crate::domain::types::User;
use crate::error::RecipeServiceError;
use crate::state::AppState;
use crate::usecase::token::AuthenticateUseCase;

/// The authenticated, active user behind the request's token.
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = RecipeServiceError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let identity = TokenIdentity::from_request_parts(parts, state).await?;
        let usecase = AuthenticateUseCase {
            repo: state.user_repo(),
        };
        let user = usecase.execute(identity.user_id).await?;
        Ok(Self(user))
    }
}

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use recipe_core::error::{AppError, FieldErrors, error_body};

/// Recipe service error variants.
#[derive(Debug, thiserror::Error)]
pub enum RecipeServiceError {
    #[error("recipe not found")]
    RecipeNotFound,
    #[error("ingredient not found")]
    IngredientNotFound,
    #[error("user not found")]
    UserNotFound,
    #[error("validation failed")]
    Validation(FieldErrors),
    #[error("invalid filter: {0}")]
    InvalidFilter(String),
    #[error("unable to authenticate with provided credentials")]
    InvalidCredentials,
    #[error(transparent)]
    App(#[from] AppError),
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl RecipeServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RecipeNotFound => "RECIPE_NOT_FOUND",
            Self::IngredientNotFound => "INGREDIENT_NOT_FOUND",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::Validation(_) => "VALIDATION",
            Self::InvalidFilter(_) => "INVALID_FILTER",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::App(e) => e.kind(),
            Self::Internal(_) => "INTERNAL",
        }
    }

    /// Single-field validation error.
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        Self::Validation(FieldErrors::single(field, message))
    }
}

impl From<FieldErrors> for RecipeServiceError {
    fn from(errors: FieldErrors) -> Self {
        Self::Validation(errors)
    }
}

impl From<JsonRejection> for RecipeServiceError {
    fn from(rejection: JsonRejection) -> Self {
        Self::field(FieldErrors::NON_FIELD, rejection.body_text())
    }
}

impl From<PathRejection> for RecipeServiceError {
    fn from(rejection: PathRejection) -> Self {
        tracing::debug!(error = %rejection.body_text(), "unparseable path");
        Self::App(AppError::NotFound)
    }
}

impl From<MultipartRejection> for RecipeServiceError {
    fn from(rejection: MultipartRejection) -> Self {
        Self::field(FieldErrors::NON_FIELD, rejection.body_text())
    }
}

impl From<MultipartError> for RecipeServiceError {
    fn from(error: MultipartError) -> Self {
        Self::field(FieldErrors::NON_FIELD, error.body_text())
    }
}

impl IntoResponse for RecipeServiceError {
    fn into_response(self) -> Response {
        // Extractor errors keep their own status and headers.
        if let Self::App(e) = self {
            return e.into_response();
        }
        let status = match &self {
            Self::RecipeNotFound | Self::IngredientNotFound | Self::UserNotFound => {
                StatusCode::NOT_FOUND
            }
            Self::Validation(_) | Self::InvalidFilter(_) | Self::InvalidCredentials => {
                StatusCode::BAD_REQUEST
            }
            Self::App(_) => StatusCode::UNAUTHORIZED,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if let Self::Internal(ref e) = self {
            tracing::error!(error = ?e, kind = "INTERNAL", "internal error");
        }
        let credentials_error;
        let errors = match &self {
            Self::Validation(errors) => Some(errors),
            Self::InvalidCredentials => {
                credentials_error = FieldErrors::single(
                    FieldErrors::NON_FIELD,
                    "Unable to authenticate with provided credentials.",
                );
                Some(&credentials_error)
            }
            _ => None,
        };
        let body = error_body(self.kind(), &self.to_string(), errors);
        (status, axum::Json(body)).into_response()
    }
}

use axum::extract::{FromRequest, FromRequestParts};

use recipe_core::error::FieldErrors;

use crate::error::RecipeServiceError;
use crate::usecase::user::REQUIRED;

pub mod auth;
pub mod ingredient;
pub mod recipe;
pub mod user;

/// `axum::Json` whose rejection renders as a validation error.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(RecipeServiceError))]
pub struct ApiJson<T>(pub T);

/// `axum::extract::Path` whose rejection renders as a JSON 404: an id that
/// does not parse cannot name an existing record.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(RecipeServiceError))]
pub struct ApiPath<T>(pub T);

/// Record a "required" error when a field is absent.
fn required<T>(errors: &mut FieldErrors, field: &str, value: Option<T>) -> Option<T> {
    if value.is_none() {
        errors.add(field, REQUIRED);
    }
    value
}

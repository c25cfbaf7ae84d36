//! sea-orm entities for the recipe service.

pub mod ingredients;
pub mod recipe_ingredients;
pub mod recipes;
pub mod users;

//! Domain rules shared across the recipe workspace.
//!
//! This crate contains only pure functions and types with no framework dependencies.
//! Import in `usecase/` and `domain/` layers; never in `infra/` or `handlers/`.

pub mod filter;
pub mod image;
pub mod price;
pub mod user;

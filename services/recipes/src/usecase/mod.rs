pub mod ingredient;
pub mod password;
pub mod recipe;
pub mod token;
pub mod user;

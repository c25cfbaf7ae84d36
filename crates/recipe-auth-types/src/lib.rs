//! Token authentication shared across recipe services.
//!
//! Provides JWT issuance/validation and the `TokenIdentity` extractor for
//! `Authorization: Token <jwt>` headers.

pub mod identity;
pub mod token;

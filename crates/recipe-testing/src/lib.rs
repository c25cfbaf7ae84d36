//! Test utilities for recipe services.
//!
//! Provides `MockAuth` (signed `Authorization` headers) and sample upload payloads.
//! Import from dev-dependencies only, never from production code.

pub mod auth;
pub mod fixture;

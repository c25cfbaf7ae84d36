//! HTTP plumbing shared by recipe services: error bodies, health probes,
//! request-id/trace layers and tracing setup.

pub mod error;
pub mod health;
pub mod middleware;
pub mod tracing;

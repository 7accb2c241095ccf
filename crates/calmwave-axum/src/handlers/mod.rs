//! HTTP request handlers for the Axum web server.
//!
//! Handlers are thin wrappers that delegate to the core services.

pub mod generate;
pub mod health;
pub mod meditations;

#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]
// DefaultOpenAiClient is used through the core ports, not its generic backend
#![allow(private_interfaces, private_bounds)]

mod client;
mod config;
mod error;
mod http;
mod models;
mod port;

// ============================================================================
// Public API
// ============================================================================

pub use client::DefaultOpenAiClient;
pub use config::{DEFAULT_BASE_URL, OpenAiConfig};
pub use error::OpenAiError;

// Silence unused dev-dependency warnings
#[cfg(test)]
use tokio_test as _;

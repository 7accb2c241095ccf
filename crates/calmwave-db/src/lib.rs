#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

pub mod factory;
pub mod repositories;
pub mod setup;

pub use factory::RepositoryFactory;
pub use repositories::SqliteMeditationRepository;

pub use setup::setup_database;
#[cfg(any(test, feature = "test-utils"))]
pub use setup::setup_test_database;

// Silence unused dev-dependency warnings
#[cfg(test)]
use tokio_test as _;

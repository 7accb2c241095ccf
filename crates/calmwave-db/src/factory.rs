//! Composition utilities for wiring `SQLite` repositories.
//!
//! Construction only, no domain logic.

use std::sync::Arc;

use calmwave_core::MeditationRepository;
use sqlx::SqlitePool;

use crate::repositories::SqliteMeditationRepository;

/// Factory for creating repository instances with `SQLite` backends.
pub struct RepositoryFactory;

impl RepositoryFactory {
    /// Meditation repository as the port trait object the pipeline expects.
    pub fn meditation_repository(pool: SqlitePool) -> Arc<dyn MeditationRepository> {
        Arc::new(SqliteMeditationRepository::new(pool))
    }
}

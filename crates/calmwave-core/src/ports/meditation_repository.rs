//! Meditation repository trait definition.
//!
//! This port defines the interface for meditation persistence operations.
//! Implementations must handle all storage details internally.

use async_trait::async_trait;
use uuid::Uuid;

use super::RepositoryError;
use crate::domain::{Meditation, MeditationPage, NewMeditation};

/// Repository for finished meditations.
///
/// # Design Rules
///
/// - No `sqlx` types in signatures
/// - `insert` is only ever called once the final audio exists
/// - Ownership checks belong in the history service, not here
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MeditationRepository: Send + Sync {
    /// Store a new meditation and return the persisted record.
    async fn insert(&self, meditation: &NewMeditation) -> Result<Meditation, RepositoryError>;

    /// Get a meditation by id.
    ///
    /// Returns `Err(RepositoryError::NotFound)` if it doesn't exist.
    async fn get(&self, id: Uuid) -> Result<Meditation, RepositoryError>;

    /// One page of a user's meditations, newest first. Pages start at 1.
    async fn list_by_user(
        &self,
        user_id: &str,
        page: u32,
        limit: u32,
    ) -> Result<MeditationPage, RepositoryError>;
}

/// A repository that stores nothing, for local runs without a database.
///
/// `insert` returns the record it would have stored.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMeditationRepository;

#[async_trait]
impl MeditationRepository for NoopMeditationRepository {
    async fn insert(&self, meditation: &NewMeditation) -> Result<Meditation, RepositoryError> {
        Ok(meditation.clone().into_meditation())
    }

    async fn get(&self, id: Uuid) -> Result<Meditation, RepositoryError> {
        Err(RepositoryError::NotFound(format!("meditation {id}")))
    }

    async fn list_by_user(
        &self,
        _user_id: &str,
        page: u32,
        limit: u32,
    ) -> Result<MeditationPage, RepositoryError> {
        Ok(MeditationPage {
            meditations: Vec::new(),
            total: 0,
            page,
            limit,
        })
    }
}

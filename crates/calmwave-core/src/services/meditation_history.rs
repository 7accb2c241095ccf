//! Meditation history service - thin orchestrator over the repository.
//!
//! Applies paging defaults and enforces that callers only see their own
//! records.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Meditation, MeditationPage};
use crate::ports::{MeditationRepository, RepositoryError};

/// Page returned when none is requested.
pub const DEFAULT_PAGE: u32 = 1;

/// Page size used when none is requested.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Largest page size a caller may ask for.
pub const MAX_PAGE_SIZE: u32 = 50;

/// Read access to stored meditations.
pub struct MeditationHistoryService {
    repo: Arc<dyn MeditationRepository>,
}

impl MeditationHistoryService {
    /// Create a new history service.
    pub fn new(repo: Arc<dyn MeditationRepository>) -> Self {
        Self { repo }
    }

    /// List a user's meditations, newest first.
    pub async fn list_for_user(
        &self,
        user_id: &str,
        page: Option<u32>,
        limit: Option<u32>,
    ) -> Result<MeditationPage, RepositoryError> {
        let page = page.unwrap_or(DEFAULT_PAGE).max(1);
        let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
        self.repo.list_by_user(user_id, page, limit).await
    }

    /// Get one meditation, hiding records owned by someone else.
    pub async fn get_for_user(&self, user_id: &str, id: Uuid) -> Result<Meditation, RepositoryError> {
        let meditation = self.repo.get(id).await?;
        if meditation.user_id != user_id {
            return Err(RepositoryError::NotFound(format!("meditation {id}")));
        }
        Ok(meditation)
    }
}

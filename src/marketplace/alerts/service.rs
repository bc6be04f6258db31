use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;

use super::criteria::CriteriaForm;
use super::domain::{SavedSearch, SavedSearchId};
use super::repository::{SavedSearchRepository, SearchStoreError};
use crate::marketplace::directory::{DirectoryError, UserDirectory, UserId};

const DEFAULT_NAME: &str = "Saved Search";
const NAME_LIMIT: usize = 80;

static SEARCH_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_search_id() -> SavedSearchId {
    let id = SEARCH_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SavedSearchId(format!("search-{id:06}"))
}

/// Request payload for creating a saved search.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateSavedSearch {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub criteria: CriteriaForm,
}

/// Manages the saved-search collection: creation behind the premium gate,
/// owner-scoped listing, and owner-checked deletion.
pub struct SavedSearchService<S, D> {
    searches: Arc<S>,
    directory: Arc<D>,
}

impl<S, D> SavedSearchService<S, D>
where
    S: SavedSearchRepository + 'static,
    D: UserDirectory + 'static,
{
    pub fn new(searches: Arc<S>, directory: Arc<D>) -> Self {
        Self {
            searches,
            directory,
        }
    }

    /// Create a saved search for `owner`. Criteria are normalized here,
    /// once; later match passes consume the structured form as-is.
    pub fn create(
        &self,
        owner: &UserId,
        request: CreateSavedSearch,
    ) -> Result<SavedSearch, SavedSearchError> {
        let recipient = self
            .directory
            .recipient(owner)?
            .ok_or(SavedSearchError::UnknownUser)?;
        if !recipient.premium {
            return Err(SavedSearchError::PremiumRequired);
        }

        let search = SavedSearch {
            id: next_search_id(),
            owner: owner.clone(),
            name: display_name(&request.name),
            criteria: request.criteria.normalize(),
            is_active: true,
            last_notified_at: None,
            created_at: Utc::now(),
        };

        let stored = self.searches.insert(search)?;
        Ok(stored)
    }

    /// A user's searches, newest first.
    pub fn list_for_owner(&self, owner: &UserId) -> Result<Vec<SavedSearch>, SavedSearchError> {
        let searches = self.searches.for_owner(owner)?;
        Ok(searches)
    }

    /// Delete a search; only its owner may do so.
    pub fn delete(&self, owner: &UserId, id: &SavedSearchId) -> Result<(), SavedSearchError> {
        let search = self
            .searches
            .fetch(id)?
            .ok_or(SavedSearchError::NotFound)?;
        if &search.owner != owner {
            return Err(SavedSearchError::NotOwner);
        }

        self.searches.delete(id)?;
        Ok(())
    }
}

fn display_name(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return DEFAULT_NAME.to_string();
    }
    trimmed.chars().take(NAME_LIMIT).collect()
}

/// Error raised by the saved-search service.
#[derive(Debug, thiserror::Error)]
pub enum SavedSearchError {
    #[error("no such user")]
    UnknownUser,
    #[error("saved searches require a premium subscription")]
    PremiumRequired,
    #[error("saved search not found")]
    NotFound,
    #[error("you do not own this saved search")]
    NotOwner,
    #[error(transparent)]
    Store(#[from] SearchStoreError),
    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

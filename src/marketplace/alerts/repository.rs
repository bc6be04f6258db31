use chrono::{DateTime, Utc};

use super::domain::{SavedSearch, SavedSearchId};
use crate::marketplace::directory::UserId;

/// Storage abstraction over the saved-search collection.
pub trait SavedSearchRepository: Send + Sync {
    fn insert(&self, search: SavedSearch) -> Result<SavedSearch, SearchStoreError>;
    fn fetch(&self, id: &SavedSearchId) -> Result<Option<SavedSearch>, SearchStoreError>;
    /// Searches owned by one user, newest first.
    fn for_owner(&self, owner: &UserId) -> Result<Vec<SavedSearch>, SearchStoreError>;
    /// Every search currently flagged active, across all owners.
    fn active(&self) -> Result<Vec<SavedSearch>, SearchStoreError>;
    fn delete(&self, id: &SavedSearchId) -> Result<(), SearchStoreError>;
    /// Targeted single-field update recording a dispatched alert. Must not
    /// re-validate or rewrite the rest of the record.
    fn mark_notified(&self, id: &SavedSearchId, at: DateTime<Utc>)
        -> Result<(), SearchStoreError>;
}

/// Error enumeration for saved-search store failures.
#[derive(Debug, thiserror::Error)]
pub enum SearchStoreError {
    #[error("saved search already exists")]
    Conflict,
    #[error("saved search not found")]
    NotFound,
    #[error("saved-search store unavailable: {0}")]
    Unavailable(String),
}

use std::sync::Arc;

use super::domain::SavedSearch;
use super::repository::{SavedSearchRepository, SearchStoreError};
use crate::marketplace::directory::{DirectoryError, UserDirectory};

/// An active search paired with its owner's delivery address.
#[derive(Debug, Clone)]
pub struct AlertCandidate {
    pub search: SavedSearch,
    pub email: String,
}

/// Joins active saved searches with their owners and keeps only those whose
/// owner exists and holds a premium subscription.
pub struct CandidateSelector<S, D> {
    searches: Arc<S>,
    directory: Arc<D>,
}

impl<S, D> CandidateSelector<S, D>
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

    /// The full candidate set for one notification pass. Finite and eager;
    /// the active set is expected to stay small relative to listing volume.
    pub fn candidates(&self) -> Result<Vec<AlertCandidate>, SelectionError> {
        let active = self.searches.active()?;

        let mut candidates = Vec::with_capacity(active.len());
        for search in active {
            let recipient = match self.directory.recipient(&search.owner)? {
                Some(recipient) => recipient,
                None => continue,
            };
            if !recipient.premium {
                continue;
            }

            candidates.push(AlertCandidate {
                search,
                email: recipient.email,
            });
        }

        Ok(candidates)
    }
}

/// Error raised while assembling the candidate set.
#[derive(Debug, thiserror::Error)]
pub enum SelectionError {
    #[error(transparent)]
    Store(#[from] SearchStoreError),
    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

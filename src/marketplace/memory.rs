//! In-memory store implementations backing the binary, the CLI preview, and
//! the integration tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};

use crate::marketplace::alerts::domain::{SavedSearch, SavedSearchId};
use crate::marketplace::alerts::repository::{SavedSearchRepository, SearchStoreError};
use crate::marketplace::directory::{AlertRecipient, DirectoryError, UserDirectory, UserId};
use crate::marketplace::listings::domain::{Listing, ListingId};
use crate::marketplace::listings::repository::{ListingRepository, ListingStoreError};

#[derive(Default, Clone)]
pub struct MemoryListingStore {
    listings: Arc<Mutex<HashMap<ListingId, Listing>>>,
}

impl ListingRepository for MemoryListingStore {
    fn insert(&self, listing: Listing) -> Result<Listing, ListingStoreError> {
        let mut guard = self.listings.lock().expect("listing mutex poisoned");
        if guard.contains_key(&listing.id) {
            return Err(ListingStoreError::Conflict);
        }
        guard.insert(listing.id.clone(), listing.clone());
        Ok(listing)
    }

    fn fetch(&self, id: &ListingId) -> Result<Option<Listing>, ListingStoreError> {
        let guard = self.listings.lock().expect("listing mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

#[derive(Default, Clone)]
pub struct MemorySearchStore {
    searches: Arc<Mutex<HashMap<SavedSearchId, SavedSearch>>>,
}

impl SavedSearchRepository for MemorySearchStore {
    fn insert(&self, search: SavedSearch) -> Result<SavedSearch, SearchStoreError> {
        let mut guard = self.searches.lock().expect("search mutex poisoned");
        if guard.contains_key(&search.id) {
            return Err(SearchStoreError::Conflict);
        }
        guard.insert(search.id.clone(), search.clone());
        Ok(search)
    }

    fn fetch(&self, id: &SavedSearchId) -> Result<Option<SavedSearch>, SearchStoreError> {
        let guard = self.searches.lock().expect("search mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn for_owner(&self, owner: &UserId) -> Result<Vec<SavedSearch>, SearchStoreError> {
        let guard = self.searches.lock().expect("search mutex poisoned");
        let mut owned: Vec<SavedSearch> = guard
            .values()
            .filter(|search| &search.owner == owner)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    fn active(&self) -> Result<Vec<SavedSearch>, SearchStoreError> {
        let guard = self.searches.lock().expect("search mutex poisoned");
        let mut active: Vec<SavedSearch> = guard
            .values()
            .filter(|search| search.is_active)
            .cloned()
            .collect();
        // Stable order keeps dispatch deterministic across passes.
        active.sort_by(|a, b| a.id.0.cmp(&b.id.0));
        Ok(active)
    }

    fn delete(&self, id: &SavedSearchId) -> Result<(), SearchStoreError> {
        let mut guard = self.searches.lock().expect("search mutex poisoned");
        guard
            .remove(id)
            .map(|_| ())
            .ok_or(SearchStoreError::NotFound)
    }

    fn mark_notified(
        &self,
        id: &SavedSearchId,
        at: DateTime<Utc>,
    ) -> Result<(), SearchStoreError> {
        let mut guard = self.searches.lock().expect("search mutex poisoned");
        let search = guard.get_mut(id).ok_or(SearchStoreError::NotFound)?;
        // The stamp never moves backwards.
        if search.last_notified_at.map_or(true, |prev| at >= prev) {
            search.last_notified_at = Some(at);
        }
        Ok(())
    }
}

#[derive(Default, Clone)]
pub struct MemoryUserDirectory {
    users: Arc<Mutex<HashMap<UserId, AlertRecipient>>>,
}

impl MemoryUserDirectory {
    pub fn upsert(&self, user: UserId, recipient: AlertRecipient) {
        self.users
            .lock()
            .expect("directory mutex poisoned")
            .insert(user, recipient);
    }
}

impl UserDirectory for MemoryUserDirectory {
    fn recipient(&self, user: &UserId) -> Result<Option<AlertRecipient>, DirectoryError> {
        let guard = self.users.lock().expect("directory mutex poisoned");
        Ok(guard.get(user).cloned())
    }
}

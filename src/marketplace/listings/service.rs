use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;

use super::domain::{Listing, ListingDraft, ListingId};
use super::repository::{ListingRepository, ListingStoreError};

static LISTING_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_listing_id() -> ListingId {
    let id = LISTING_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ListingId(format!("listing-{id:06}"))
}

/// Intake service persisting published listings.
pub struct ListingService<L> {
    listings: Arc<L>,
}

impl<L> ListingService<L>
where
    L: ListingRepository + 'static,
{
    pub fn new(listings: Arc<L>) -> Self {
        Self { listings }
    }

    /// Publish a new listing, returning the stored record.
    pub fn publish(&self, draft: ListingDraft) -> Result<Listing, ListingServiceError> {
        let name = draft.name.trim().to_string();
        if name.is_empty() {
            return Err(ListingServiceError::MissingName);
        }

        let location = draft.location.trim().to_string();
        if location.is_empty() {
            return Err(ListingServiceError::MissingLocation);
        }

        let listing = Listing {
            id: next_listing_id(),
            landlord: draft.landlord,
            name,
            location,
            monthly_rent: draft.monthly_rent,
            bedrooms: draft.bedrooms,
            amenities: draft.amenities,
            created_at: Utc::now(),
        };

        let stored = self.listings.insert(listing)?;
        Ok(stored)
    }
}

/// Error raised by the listing intake service.
#[derive(Debug, thiserror::Error)]
pub enum ListingServiceError {
    #[error("listing name is required")]
    MissingName,
    #[error("listing location is required")]
    MissingLocation,
    #[error(transparent)]
    Store(#[from] ListingStoreError),
}

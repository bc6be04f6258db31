use super::domain::{Listing, ListingId};

/// Storage abstraction so intake can be exercised in isolation.
pub trait ListingRepository: Send + Sync {
    fn insert(&self, listing: Listing) -> Result<Listing, ListingStoreError>;
    fn fetch(&self, id: &ListingId) -> Result<Option<Listing>, ListingStoreError>;
}

/// Error enumeration for listing-store failures.
#[derive(Debug, thiserror::Error)]
pub enum ListingStoreError {
    #[error("listing already exists")]
    Conflict,
    #[error("listing store unavailable: {0}")]
    Unavailable(String),
}

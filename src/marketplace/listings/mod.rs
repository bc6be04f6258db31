//! Listing intake: the minimal listing surface that feeds the alert pipeline.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{Amenity, AmenitySet, Listing, ListingDraft, ListingId};
pub use repository::{ListingRepository, ListingStoreError};
pub use router::{listing_router, ListingIntake};
pub use service::{ListingService, ListingServiceError};

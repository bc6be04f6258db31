use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::marketplace::alerts::criteria::{CriteriaForm, SearchCriteria};
use crate::marketplace::alerts::domain::{SavedSearch, SavedSearchId};
use crate::marketplace::alerts::mailer::{MailError, MailMessage, MailSender};
use crate::marketplace::alerts::pipeline::AlertPipeline;
use crate::marketplace::alerts::repository::{SavedSearchRepository, SearchStoreError};
use crate::marketplace::alerts::router::search_router;
use crate::marketplace::alerts::service::SavedSearchService;
use crate::marketplace::directory::{AlertRecipient, DirectoryError, UserDirectory, UserId};
use crate::marketplace::listings::domain::{AmenitySet, Listing, ListingId};
use crate::marketplace::memory::{MemorySearchStore, MemoryUserDirectory};

pub(super) fn listing() -> Listing {
    Listing {
        id: ListingId("listing-000101".to_string()),
        landlord: UserId("landlord-7".to_string()),
        name: "Two-bed house near the CBD".to_string(),
        location: "Gaborone".to_string(),
        monthly_rent: 3500,
        bedrooms: 2,
        amenities: AmenitySet {
            parking: true,
            ..AmenitySet::default()
        },
        created_at: Utc::now(),
    }
}

pub(super) fn criteria_in_range() -> SearchCriteria {
    CriteriaForm {
        min_rent: 3000,
        max_rent: 4000,
        amenities: AmenitySet {
            parking: true,
            ..AmenitySet::default()
        },
        ..CriteriaForm::default()
    }
    .normalize()
}

pub(super) fn saved_search(id: &str, owner: &UserId, criteria: SearchCriteria) -> SavedSearch {
    SavedSearch {
        id: SavedSearchId(id.to_string()),
        owner: owner.clone(),
        name: "Saved Search".to_string(),
        criteria,
        is_active: true,
        last_notified_at: None,
        created_at: Utc::now(),
    }
}

pub(super) fn premium_user(directory: &MemoryUserDirectory, id: &str, email: &str) -> UserId {
    let user = UserId(id.to_string());
    directory.upsert(
        user.clone(),
        AlertRecipient {
            email: email.to_string(),
            premium: true,
        },
    );
    user
}

pub(super) fn basic_user(directory: &MemoryUserDirectory, id: &str, email: &str) -> UserId {
    let user = UserId(id.to_string());
    directory.upsert(
        user.clone(),
        AlertRecipient {
            email: email.to_string(),
            premium: false,
        },
    );
    user
}

/// Mailer capturing every accepted message; addresses registered through
/// `fail_for` are refused with a transport error instead.
#[derive(Default, Clone)]
pub(super) struct RecordingMailer {
    sent: Arc<Mutex<Vec<MailMessage>>>,
    failing: Arc<Mutex<Vec<String>>>,
}

impl RecordingMailer {
    pub(super) fn sent(&self) -> Vec<MailMessage> {
        self.sent.lock().expect("mailer mutex poisoned").clone()
    }

    pub(super) fn fail_for(&self, to: &str) {
        self.failing
            .lock()
            .expect("mailer mutex poisoned")
            .push(to.to_string());
    }
}

impl MailSender for RecordingMailer {
    fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        let failing = self.failing.lock().expect("mailer mutex poisoned");
        if failing.iter().any(|to| to == &message.to) {
            return Err(MailError::Transport(
                "smtp connection refused".to_string(),
            ));
        }
        drop(failing);

        self.sent
            .lock()
            .expect("mailer mutex poisoned")
            .push(message.clone());
        Ok(())
    }
}

pub(super) struct UnavailableSearchStore;

impl SavedSearchRepository for UnavailableSearchStore {
    fn insert(&self, _search: SavedSearch) -> Result<SavedSearch, SearchStoreError> {
        Err(SearchStoreError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &SavedSearchId) -> Result<Option<SavedSearch>, SearchStoreError> {
        Err(SearchStoreError::Unavailable("database offline".to_string()))
    }

    fn for_owner(&self, _owner: &UserId) -> Result<Vec<SavedSearch>, SearchStoreError> {
        Err(SearchStoreError::Unavailable("database offline".to_string()))
    }

    fn active(&self) -> Result<Vec<SavedSearch>, SearchStoreError> {
        Err(SearchStoreError::Unavailable("database offline".to_string()))
    }

    fn delete(&self, _id: &SavedSearchId) -> Result<(), SearchStoreError> {
        Err(SearchStoreError::Unavailable("database offline".to_string()))
    }

    fn mark_notified(
        &self,
        _id: &SavedSearchId,
        _at: DateTime<Utc>,
    ) -> Result<(), SearchStoreError> {
        Err(SearchStoreError::Unavailable("database offline".to_string()))
    }
}

pub(super) struct UnavailableDirectory;

impl UserDirectory for UnavailableDirectory {
    fn recipient(&self, _user: &UserId) -> Result<Option<AlertRecipient>, DirectoryError> {
        Err(DirectoryError::Unavailable("directory offline".to_string()))
    }
}

pub(super) fn pipeline(
    searches: Arc<MemorySearchStore>,
    directory: Arc<MemoryUserDirectory>,
    mail: Arc<RecordingMailer>,
) -> AlertPipeline<MemorySearchStore, MemoryUserDirectory, RecordingMailer> {
    AlertPipeline::new(searches, directory, mail)
}

pub(super) fn build_service() -> (
    SavedSearchService<MemorySearchStore, MemoryUserDirectory>,
    Arc<MemorySearchStore>,
    Arc<MemoryUserDirectory>,
) {
    let searches = Arc::new(MemorySearchStore::default());
    let directory = Arc::new(MemoryUserDirectory::default());
    let service = SavedSearchService::new(searches.clone(), directory.clone());
    (service, searches, directory)
}

pub(super) fn search_router_with_service(
    service: SavedSearchService<MemorySearchStore, MemoryUserDirectory>,
) -> axum::Router {
    search_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

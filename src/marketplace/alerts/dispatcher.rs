use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::mailer::{MailError, MailMessage, MailSender};
use super::repository::{SavedSearchRepository, SearchStoreError};
use super::selector::AlertCandidate;
use crate::marketplace::listings::domain::Listing;

/// Sends one alert per matched (search, listing) pair and records the
/// dispatch timestamp on the search.
pub struct AlertDispatcher<S, M> {
    searches: Arc<S>,
    mail: Arc<M>,
}

impl<S, M> AlertDispatcher<S, M>
where
    S: SavedSearchRepository + 'static,
    M: MailSender + 'static,
{
    pub fn new(searches: Arc<S>, mail: Arc<M>) -> Self {
        Self { searches, mail }
    }

    /// Send the alert, then stamp `last_notified_at` with a targeted store
    /// update. The stamp is skipped when the send fails, so an unstamped
    /// search still reflects the miss.
    pub fn dispatch(
        &self,
        candidate: &AlertCandidate,
        listing: &Listing,
    ) -> Result<DateTime<Utc>, DispatchError> {
        let message = compose(candidate, listing);
        self.mail.send(&message)?;

        let notified_at = Utc::now();
        self.searches
            .mark_notified(&candidate.search.id, notified_at)?;

        Ok(notified_at)
    }
}

fn compose(candidate: &AlertCandidate, listing: &Listing) -> MailMessage {
    MailMessage {
        to: candidate.email.clone(),
        subject: "New property matching your saved search".to_string(),
        text: format!(
            "A new property was listed in {} for {}. Open the app to view details.",
            listing.location, listing.monthly_rent
        ),
    }
}

/// Error raised while dispatching a single alert.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error(transparent)]
    Mail(#[from] MailError),
    #[error(transparent)]
    Store(#[from] SearchStoreError),
}

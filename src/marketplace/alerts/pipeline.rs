use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use super::dispatcher::AlertDispatcher;
use super::domain::SavedSearchId;
use super::mailer::MailSender;
use super::repository::SavedSearchRepository;
use super::selector::{CandidateSelector, SelectionError};
use crate::marketplace::directory::UserDirectory;
use crate::marketplace::listings::domain::Listing;

/// Outcome of one notification pass over a newly created listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AlertRunReport {
    /// Active searches whose owner is present and premium.
    pub candidates: usize,
    /// Candidates whose criteria matched the listing.
    pub matched: usize,
    /// Alerts delivered and stamped.
    pub sent: usize,
    /// Searches whose dispatch failed; their `last_notified_at` stays
    /// untouched unless the failure happened after the send itself.
    pub failed: Vec<SavedSearchId>,
}

/// Error aborting an entire notification pass before any dispatch.
#[derive(Debug, thiserror::Error)]
pub enum AlertRunError {
    #[error(transparent)]
    Selection(#[from] SelectionError),
}

/// Sequences candidate selection, predicate evaluation, and dispatch for one
/// listing-creation event.
pub struct AlertPipeline<S, D, M> {
    selector: CandidateSelector<S, D>,
    dispatcher: AlertDispatcher<S, M>,
}

impl<S, D, M> AlertPipeline<S, D, M>
where
    S: SavedSearchRepository + 'static,
    D: UserDirectory + 'static,
    M: MailSender + 'static,
{
    pub fn new(searches: Arc<S>, directory: Arc<D>, mail: Arc<M>) -> Self {
        Self {
            selector: CandidateSelector::new(searches.clone(), directory),
            dispatcher: AlertDispatcher::new(searches, mail),
        }
    }

    /// Run one pass. Sends stay sequential and every match is attempted even
    /// when an earlier send fails. There is no dedup beyond the
    /// `last_notified_at` stamp: re-running for the same listing notifies
    /// the same searches again.
    pub fn run(&self, listing: &Listing) -> Result<AlertRunReport, AlertRunError> {
        let candidates = self.selector.candidates()?;

        let mut report = AlertRunReport {
            candidates: candidates.len(),
            ..AlertRunReport::default()
        };

        for candidate in &candidates {
            if !candidate.search.criteria.matches(listing) {
                continue;
            }
            report.matched += 1;

            match self.dispatcher.dispatch(candidate, listing) {
                Ok(_) => report.sent += 1,
                Err(error) => {
                    warn!(
                        search = %candidate.search.id.0,
                        listing = %listing.id.0,
                        %error,
                        "alert dispatch failed"
                    );
                    report.failed.push(candidate.search.id.clone());
                }
            }
        }

        Ok(report)
    }

    /// Best-effort envelope for the listing-creation path: failures are
    /// logged and swallowed so the triggering request never sees them.
    pub fn notify_listing_created(&self, listing: &Listing) {
        match self.run(listing) {
            Ok(report) => info!(
                listing = %listing.id.0,
                candidates = report.candidates,
                matched = report.matched,
                sent = report.sent,
                failed = report.failed.len(),
                "saved-search alert pass finished"
            ),
            Err(error) => warn!(
                listing = %listing.id.0,
                %error,
                "saved-search alert pass aborted"
            ),
        }
    }
}

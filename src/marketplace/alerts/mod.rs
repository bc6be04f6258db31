//! Saved-search alerting: criteria evaluation, candidate selection, and the
//! notification pipeline triggered by listing creation.

pub mod criteria;
pub mod dispatcher;
pub mod domain;
pub mod mailer;
pub mod pipeline;
pub mod repository;
pub mod router;
pub mod selector;
pub mod service;

#[cfg(test)]
mod tests;

pub use criteria::{CriteriaForm, SearchCriteria};
pub use dispatcher::{AlertDispatcher, DispatchError};
pub use domain::{SavedSearch, SavedSearchId, SavedSearchView};
pub use mailer::{LogMailer, MailError, MailMessage, MailSender};
pub use pipeline::{AlertPipeline, AlertRunError, AlertRunReport};
pub use repository::{SavedSearchRepository, SearchStoreError};
pub use router::search_router;
pub use selector::{AlertCandidate, CandidateSelector, SelectionError};
pub use service::{CreateSavedSearch, SavedSearchError, SavedSearchService};

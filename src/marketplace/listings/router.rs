use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde_json::json;

use super::domain::ListingDraft;
use super::repository::{ListingRepository, ListingStoreError};
use super::service::{ListingService, ListingServiceError};
use crate::marketplace::alerts::mailer::MailSender;
use crate::marketplace::alerts::pipeline::AlertPipeline;
use crate::marketplace::alerts::repository::SavedSearchRepository;
use crate::marketplace::directory::UserDirectory;

/// State for the intake route: the intake service plus the alert pipeline
/// triggered after every successful publish.
pub struct ListingIntake<L, S, D, M> {
    pub service: ListingService<L>,
    pub pipeline: Arc<AlertPipeline<S, D, M>>,
}

/// Router builder exposing the listing intake endpoint.
pub fn listing_router<L, S, D, M>(intake: Arc<ListingIntake<L, S, D, M>>) -> Router
where
    L: ListingRepository + 'static,
    S: SavedSearchRepository + 'static,
    D: UserDirectory + 'static,
    M: MailSender + 'static,
{
    Router::new()
        .route("/api/v1/listings", post(publish_handler::<L, S, D, M>))
        .with_state(intake)
}

pub(crate) async fn publish_handler<L, S, D, M>(
    State(intake): State<Arc<ListingIntake<L, S, D, M>>>,
    axum::Json(draft): axum::Json<ListingDraft>,
) -> Response
where
    L: ListingRepository + 'static,
    S: SavedSearchRepository + 'static,
    D: UserDirectory + 'static,
    M: MailSender + 'static,
{
    match intake.service.publish(draft) {
        Ok(listing) => {
            // Alert fan-out must never gate the creation response; hand the
            // pass to a blocking task and reply immediately.
            let pipeline = intake.pipeline.clone();
            let snapshot = listing.clone();
            tokio::task::spawn_blocking(move || pipeline.notify_listing_created(&snapshot));

            (StatusCode::CREATED, axum::Json(listing)).into_response()
        }
        Err(error @ (ListingServiceError::MissingName | ListingServiceError::MissingLocation)) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(ListingServiceError::Store(ListingStoreError::Conflict)) => {
            let payload = json!({ "error": "listing already exists" });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, post},
    Router,
};
use serde_json::json;

use super::domain::{SavedSearch, SavedSearchId};
use super::repository::{SavedSearchRepository, SearchStoreError};
use super::service::{CreateSavedSearch, SavedSearchError, SavedSearchService};
use crate::marketplace::directory::{UserDirectory, UserId};

/// Router builder exposing saved-search management endpoints.
///
/// Authentication is handled upstream; routes identify the acting user by
/// path segment and the service enforces the premium gate and ownership.
pub fn search_router<S, D>(service: Arc<SavedSearchService<S, D>>) -> Router
where
    S: SavedSearchRepository + 'static,
    D: UserDirectory + 'static,
{
    Router::new()
        .route(
            "/api/v1/users/:user_id/searches",
            post(create_handler::<S, D>).get(list_handler::<S, D>),
        )
        .route(
            "/api/v1/users/:user_id/searches/:search_id",
            delete(delete_handler::<S, D>),
        )
        .with_state(service)
}

pub(crate) async fn create_handler<S, D>(
    State(service): State<Arc<SavedSearchService<S, D>>>,
    Path(user_id): Path<String>,
    axum::Json(request): axum::Json<CreateSavedSearch>,
) -> Response
where
    S: SavedSearchRepository + 'static,
    D: UserDirectory + 'static,
{
    match service.create(&UserId(user_id), request) {
        Ok(search) => (StatusCode::CREATED, axum::Json(search.view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_handler<S, D>(
    State(service): State<Arc<SavedSearchService<S, D>>>,
    Path(user_id): Path<String>,
) -> Response
where
    S: SavedSearchRepository + 'static,
    D: UserDirectory + 'static,
{
    match service.list_for_owner(&UserId(user_id)) {
        Ok(searches) => {
            let views: Vec<_> = searches.iter().map(SavedSearch::view).collect();
            let payload = json!({ "results": views.len(), "data": views });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn delete_handler<S, D>(
    State(service): State<Arc<SavedSearchService<S, D>>>,
    Path((user_id, search_id)): Path<(String, String)>,
) -> Response
where
    S: SavedSearchRepository + 'static,
    D: UserDirectory + 'static,
{
    match service.delete(&UserId(user_id), &SavedSearchId(search_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: SavedSearchError) -> Response {
    let status = match &error {
        SavedSearchError::UnknownUser | SavedSearchError::NotFound => StatusCode::NOT_FOUND,
        SavedSearchError::PremiumRequired | SavedSearchError::NotOwner => StatusCode::FORBIDDEN,
        SavedSearchError::Store(SearchStoreError::Conflict) => StatusCode::CONFLICT,
        SavedSearchError::Store(_) | SavedSearchError::Directory(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}

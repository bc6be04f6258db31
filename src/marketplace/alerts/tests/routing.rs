use super::common::*;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

use crate::marketplace::alerts::router;
use crate::marketplace::alerts::service::CreateSavedSearch;
use crate::marketplace::memory::{MemorySearchStore, MemoryUserDirectory};

#[tokio::test]
async fn create_route_returns_created_for_premium_owner() {
    let (service, _, directory) = build_service();
    premium_user(&directory, "tenant-1", "tenant@example.test");
    let app = search_router_with_service(service);

    let body = json!({
        "name": "CBD two-beds",
        "criteria": { "location": "Gaborone", "max_rent": 4000 },
    });

    let response = app
        .oneshot(
            axum::http::Request::post("/api/v1/users/tenant-1/searches")
                .header(axum::http::header::CONTENT_TYPE, "application/json")
                .body(axum::body::Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert_eq!(
        payload.get("name").and_then(serde_json::Value::as_str),
        Some("CBD two-beds")
    );
    assert!(payload.get("id").is_some());
    assert_eq!(
        payload
            .get("is_active")
            .and_then(serde_json::Value::as_bool),
        Some(true)
    );
}

#[tokio::test]
async fn create_route_rejects_basic_plan() {
    let (service, _, directory) = build_service();
    basic_user(&directory, "tenant-2", "basic@example.test");
    let app = search_router_with_service(service);

    let response = app
        .oneshot(
            axum::http::Request::post("/api/v1/users/tenant-2/searches")
                .header(axum::http::header::CONTENT_TYPE, "application/json")
                .body(axum::body::Body::from(
                    serde_json::to_vec(&json!({ "name": "anything" })).unwrap(),
                ))
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn create_handler_reports_unknown_user() {
    let (service, _, _) = build_service();
    let service = Arc::new(service);

    let response = router::create_handler::<MemorySearchStore, MemoryUserDirectory>(
        State(service),
        Path("ghost".to_string()),
        axum::Json(CreateSavedSearch::default()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_route_returns_owned_searches() {
    let (service, _, directory) = build_service();
    let owner = premium_user(&directory, "tenant-1", "tenant@example.test");
    service
        .create(&owner, CreateSavedSearch::default())
        .expect("create succeeds");
    let app = search_router_with_service(service);

    let response = app
        .oneshot(
            axum::http::Request::get("/api/v1/users/tenant-1/searches")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(
        payload.get("results").and_then(serde_json::Value::as_u64),
        Some(1)
    );
}

#[tokio::test]
async fn delete_route_enforces_ownership() {
    let (service, _, directory) = build_service();
    let owner = premium_user(&directory, "tenant-1", "tenant@example.test");
    premium_user(&directory, "tenant-2", "other@example.test");
    let search = service
        .create(&owner, CreateSavedSearch::default())
        .expect("create succeeds");
    let app = search_router_with_service(service);

    let intruder_delete = app
        .clone()
        .oneshot(
            axum::http::Request::delete(format!(
                "/api/v1/users/tenant-2/searches/{}",
                search.id.0
            ))
            .body(axum::body::Body::empty())
            .unwrap(),
        )
        .await
        .expect("route executes");
    assert_eq!(intruder_delete.status(), StatusCode::FORBIDDEN);

    let owner_delete = app
        .oneshot(
            axum::http::Request::delete(format!(
                "/api/v1/users/tenant-1/searches/{}",
                search.id.0
            ))
            .body(axum::body::Body::empty())
            .unwrap(),
        )
        .await
        .expect("route executes");
    assert_eq!(owner_delete.status(), StatusCode::NO_CONTENT);
}

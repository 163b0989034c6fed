use std::sync::Arc;

use axum::http::{Method, StatusCode};
use serde_json::json;

use super::common::*;
use crate::http::{companion_router, CompanionService};
use crate::simulate::Latency;

#[tokio::test]
async fn created_session_starts_on_welcome_with_defaults() {
    let router = router();
    let (status, body) = send(&router, Method::POST, "/api/v1/sessions", None).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["screen"], "welcome");
    assert_eq!(body["session"]["safety_score"], 85);
    assert_eq!(body["session"]["selected_language"], "EN");
    assert_eq!(body["safety_label"], "SAFE");
}

#[tokio::test]
async fn unknown_session_is_not_found() {
    let router = router();
    let (status, body) = send(&router, Method::GET, "/api/v1/sessions/ses-missing", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "session ses-missing is not active");
}

#[tokio::test]
async fn discarded_session_is_gone() {
    let router = router();
    let id = create_session(&router).await;
    let uri = format!("/api/v1/sessions/{id}");

    let (status, _) = send(&router, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&router, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn language_round_trips_through_the_session() {
    let router = router();
    let id = create_session(&router).await;

    let (status, body) = send(
        &router,
        Method::PUT,
        &format!("/api/v1/sessions/{id}/language"),
        Some(json!({ "language": "hi" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["session"]["selected_language"], "HI");

    let (status, _) = send(
        &router,
        Method::PUT,
        &format!("/api/v1/sessions/{id}/language"),
        Some(json!({ "language": "fr" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn edges_outside_the_graph_conflict() {
    let router = router();
    let id = create_session(&router).await;
    let uri = format!("/api/v1/sessions/{id}/navigate");

    let (status, body) = send(&router, Method::POST, &uri, Some(json!({ "screen": "/police" }))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "no route from / to /police");

    let (status, _) = send(&router, Method::POST, &uri, Some(json!({ "screen": "/settings" }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn signup_mismatch_is_unprocessable_and_notified() {
    let router = router();
    let id = create_session(&router).await;
    send(
        &router,
        Method::POST,
        &format!("/api/v1/sessions/{id}/navigate"),
        Some(json!({ "screen": "signup" })),
    )
    .await;

    let (status, body) = send(
        &router,
        Method::POST,
        &format!("/api/v1/sessions/{id}/signup"),
        Some(json!({
            "full_name": "Asha Rao",
            "email": "asha@example.com",
            "phone": "+91 9000000001",
            "password": "one",
            "confirm_password": "two"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "passwords do not match");

    let (_, notifications) = send(
        &router,
        Method::GET,
        &format!("/api/v1/sessions/{id}/notifications"),
        None,
    )
    .await;
    assert_eq!(notifications[0]["level"], "destructive");

    let (_, view) = send(&router, Method::GET, &format!("/api/v1/sessions/{id}"), None).await;
    assert_eq!(view["screen"], "signup");
    assert_eq!(view["pending_notifications"], 0);
}

#[tokio::test]
async fn price_scan_reports_markup() {
    let router = router();
    let id = signed_in_session(&router).await;
    send(
        &router,
        Method::POST,
        &format!("/api/v1/sessions/{id}/navigate"),
        Some(json!({ "screen": "/negotiation" })),
    )
    .await;

    let (status, body) = send(
        &router,
        Method::POST,
        &format!("/api/v1/sessions/{id}/prices"),
        Some(json!({ "item": "wooden elephant" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["screen"], "negotiation");
    assert_eq!(body["result"]["quoted_price"], 850);
    assert_eq!(body["result"]["fair_range"]["min"], 250);
    assert_eq!(body["result"]["markup_percent"], 183);
}

#[tokio::test]
async fn operations_off_screen_conflict() {
    let router = router();
    let id = signed_in_session(&router).await;

    let (status, _) = send(
        &router,
        Method::POST,
        &format!("/api/v1/sessions/{id}/chat"),
        Some(json!({ "message": "find ATM" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn news_can_be_filtered_by_query() {
    let router = router();
    let id = signed_in_session(&router).await;
    send(
        &router,
        Method::POST,
        &format!("/api/v1/sessions/{id}/navigate"),
        Some(json!({ "screen": "/risk-news" })),
    )
    .await;

    let (status, body) = send(
        &router,
        Method::GET,
        &format!("/api/v1/sessions/{id}/news?category=weather"),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let items = body.as_array().expect("array of news");
    assert!(!items.is_empty());
    assert!(items.iter().all(|item| item["category"] == "weather"));
}

#[tokio::test]
async fn sos_from_dashboard_is_destructive() {
    let router = router();
    let id = signed_in_session(&router).await;

    let (status, body) = send(&router, Method::POST, &format!("/api/v1/sessions/{id}/sos"), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["title"], "🆘 SOS ACTIVATED");
    assert_eq!(body["result"]["level"], "destructive");
}

#[tokio::test]
async fn repository_failures_are_unavailable() {
    let service = CompanionService::new(Arc::new(UnavailableRepository), Latency::instant());
    let router = companion_router(Arc::new(service));

    let (status, body) = send(&router, Method::POST, "/api/v1/sessions", None).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "repository error: repository unavailable: store offline");
}

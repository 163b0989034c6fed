use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{header, Method, Request, Response, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use crate::flow::Companion;
use crate::http::{companion_router, CompanionRepository, CompanionService, RepositoryError};
use crate::session::SessionId;
use crate::simulate::Latency;

#[derive(Default)]
pub(super) struct MemoryRepository {
    companions: Mutex<HashMap<SessionId, Arc<Companion>>>,
}

impl CompanionRepository for MemoryRepository {
    fn insert(&self, id: SessionId, companion: Arc<Companion>) -> Result<(), RepositoryError> {
        let mut guard = self.companions.lock().expect("repository mutex poisoned");
        if guard.contains_key(&id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(id, companion);
        Ok(())
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<Arc<Companion>>, RepositoryError> {
        let guard = self.companions.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn remove(&self, id: &SessionId) -> Result<bool, RepositoryError> {
        let mut guard = self.companions.lock().expect("repository mutex poisoned");
        Ok(guard.remove(id).is_some())
    }
}

pub(super) struct UnavailableRepository;

impl CompanionRepository for UnavailableRepository {
    fn insert(&self, _id: SessionId, _companion: Arc<Companion>) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("store offline".to_string()))
    }

    fn fetch(&self, _id: &SessionId) -> Result<Option<Arc<Companion>>, RepositoryError> {
        Err(RepositoryError::Unavailable("store offline".to_string()))
    }

    fn remove(&self, _id: &SessionId) -> Result<bool, RepositoryError> {
        Err(RepositoryError::Unavailable("store offline".to_string()))
    }
}

pub(super) fn router() -> Router {
    let service = CompanionService::new(Arc::new(MemoryRepository::default()), Latency::instant());
    companion_router(Arc::new(service))
}

pub(super) async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .expect("request builds");

    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("router responds");
    read(response).await
}

async fn read(response: Response<Body>) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, value)
}

/// Create a session and return its id.
pub(super) async fn create_session(router: &Router) -> String {
    let (status, body) = send(router, Method::POST, "/api/v1/sessions", None).await;
    assert_eq!(status, StatusCode::CREATED);
    body["session_id"]
        .as_str()
        .expect("session id present")
        .to_string()
}

/// Session that has logged in and sits on the dashboard.
pub(super) async fn signed_in_session(router: &Router) -> String {
    let id = create_session(router).await;
    let (status, _) = send(
        router,
        Method::POST,
        &format!("/api/v1/sessions/{id}/navigate"),
        Some(serde_json::json!({ "screen": "/login" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = send(
        router,
        Method::POST,
        &format!("/api/v1/sessions/{id}/login"),
        Some(serde_json::json!({ "email": "priya@example.com", "password": "secret" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["screen"], "dashboard");
    id
}

//! End-to-end tests of the commands layer against a stub backend

mod common;

use std::sync::{Arc, Mutex};

use axum::extract::{Multipart, Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use pretty_assertions::assert_eq;
use serde_json::json;

use common::{client_state, sample_user, spawn_backend};
use tarasul_client::commands;
use tarasul_client::compose::ComposeForm;
use tarasul_client::db;
use tarasul_client::error::AppError;
use tarasul_client::state::AuthPhase;

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

// ============================================================================
// Login
// ============================================================================

async fn login_handler(Json(body): Json<serde_json::Value>) -> impl IntoResponse {
    if body["email"] == "user@x.edu" && body["password"] == "secret" {
        Json(json!({
            "status": "success",
            "method": "PUT",
            "data": {
                "user_id": 1,
                "email": "user@x.edu",
                "username": "user",
                "token": "abc"
            }
        }))
        .into_response()
    } else {
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "status": "error", "message": "بيانات الدخول غير صحيحة" })),
        )
            .into_response()
    }
}

#[tokio::test]
async fn login_authenticates_and_persists_the_session() {
    let origin = spawn_backend(Router::new().route("/api/users/login", post(login_handler))).await;
    let (_dir, state) = client_state(&origin).await;
    commands::restore_session(&state).await.unwrap();

    let outcome = commands::login(&state, "user@x.edu", "secret").await.unwrap();

    assert_eq!(outcome.token, "abc");
    assert_eq!(outcome.user.user_id, 1);
    assert!(outcome.requires_profile_update);

    let app_state = state.read().await;
    assert_eq!(app_state.phase, AuthPhase::Authenticated);
    assert_eq!(app_state.token(), Some("abc"));

    let (token, user) = db::load_session(&app_state.db)
        .await
        .unwrap()
        .expect("persisted session");
    assert_eq!(token, "abc");
    assert_eq!(user.user_id, 1);
}

#[tokio::test]
async fn failed_login_propagates_the_server_message_and_stays_anonymous() {
    let origin = spawn_backend(Router::new().route("/api/users/login", post(login_handler))).await;
    let (_dir, state) = client_state(&origin).await;
    commands::restore_session(&state).await.unwrap();

    let err = commands::login(&state, "user@x.edu", "wrong").await.unwrap_err();

    match err {
        AppError::Request(message) => assert_eq!(message, "بيانات الدخول غير صحيحة"),
        other => panic!("expected Request error, got {:?}", other),
    }

    let app_state = state.read().await;
    assert_eq!(app_state.phase, AuthPhase::Anonymous);
    assert!(db::load_session(&app_state.db).await.unwrap().is_none());
}

// ============================================================================
// Session expiry
// ============================================================================

async fn expired_details_handler(Path(_id): Path<i64>) -> impl IntoResponse {
    StatusCode::UNAUTHORIZED
}

#[tokio::test]
async fn a_401_clears_the_store_and_drops_to_anonymous() {
    let origin = spawn_backend(
        Router::new().route(
            "/api/transactions/details/{id}",
            get(expired_details_handler),
        ),
    )
    .await;
    let (_dir, state) = client_state(&origin).await;

    {
        let app_state = state.read().await;
        db::save_session(&app_state.db, &sample_user(), "stale")
            .await
            .unwrap();
    }
    commands::restore_session(&state).await.unwrap();
    assert_eq!(state.read().await.phase, AuthPhase::Authenticated);

    let err = commands::transaction_details(&state, 42).await.unwrap_err();
    assert!(matches!(err, AppError::SessionExpired));

    let app_state = state.read().await;
    assert_eq!(app_state.phase, AuthPhase::Anonymous);
    assert!(app_state.session.is_none());
    assert!(db::load_session(&app_state.db).await.unwrap().is_none());

    // Further calls short-circuit locally: no token, no request
    drop(app_state);
    let err = commands::inbox(&state).await.unwrap_err();
    assert!(matches!(err, AppError::NotAuthenticated));
}

// ============================================================================
// Transaction creation
// ============================================================================

#[derive(Debug, Default, Clone)]
struct RecordedSubmission {
    texts: Vec<(String, String)>,
    attachment_names: Vec<String>,
}

type Recorder = Arc<Mutex<Option<RecordedSubmission>>>;

async fn create_handler(
    State(recorder): State<Recorder>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> impl IntoResponse {
    if bearer(&headers) != Some("abc") {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let mut recorded = RecordedSubmission::default();
    while let Some(field) = multipart.next_field().await.expect("multipart field") {
        let name = field.name().unwrap_or_default().to_string();
        if name == "attachments" {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let _ = field.bytes().await.expect("attachment bytes");
            recorded.attachment_names.push(file_name);
        } else {
            let value = field.text().await.expect("text field");
            recorded.texts.push((name, value));
        }
    }
    *recorder.lock().unwrap() = Some(recorded);

    Json(json!({ "status": "success", "message": "تم إرسال المعاملة بنجاح" })).into_response()
}

async fn authed_state(origin: &str) -> (tempfile::TempDir, tarasul_client::state::SharedState) {
    let (dir, state) = client_state(origin).await;
    {
        let app_state = state.read().await;
        db::save_session(&app_state.db, &sample_user(), "abc")
            .await
            .unwrap();
    }
    commands::restore_session(&state).await.unwrap();
    (dir, state)
}

#[tokio::test]
async fn submission_multipart_carries_exactly_the_composed_fields() {
    let recorder: Recorder = Arc::new(Mutex::new(None));
    let app = Router::new()
        .route("/api/transactions/create", post(create_handler))
        .with_state(recorder.clone());
    let origin = spawn_backend(app).await;
    let (_dir, state) = authed_state(&origin).await;

    let mut form = ComposeForm::new();
    form.subject = "Test".to_string();
    form.type_id = Some(2);
    form.recipients.toggle(5);

    let message = commands::submit_transaction(&state, &form).await.unwrap();
    assert_eq!(message.message.as_deref(), Some("تم إرسال المعاملة بنجاح"));

    let recorded = recorder.lock().unwrap().clone().expect("submission seen");
    let lookup = |key: &str| {
        recorded
            .texts
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.clone())
    };

    assert_eq!(lookup("subject").as_deref(), Some("Test"));
    assert_eq!(lookup("receivers").as_deref(), Some("5"));
    assert_eq!(lookup("is_draft").as_deref(), Some("false"));
    assert_eq!(lookup("type_id").as_deref(), Some("2"));
    assert_eq!(lookup("parent_transaction_id"), None);
    assert!(recorded.attachment_names.is_empty());
}

#[tokio::test]
async fn drafts_and_attachments_flush_through_the_same_endpoint() {
    let recorder: Recorder = Arc::new(Mutex::new(None));
    let app = Router::new()
        .route("/api/transactions/create", post(create_handler))
        .with_state(recorder.clone());
    let origin = spawn_backend(app).await;
    let (_dir, state) = authed_state(&origin).await;

    let mut form = ComposeForm::new();
    form.subject = "مسودة".to_string();
    form.add_attachment("scan.pdf", vec![1, 2, 3], "صورة البطاقة")
        .unwrap();
    form.add_attachment("report.pdf", vec![4], "تقرير").unwrap();

    commands::save_draft(&state, &form).await.unwrap();

    let recorded = recorder.lock().unwrap().clone().expect("submission seen");
    let is_draft = recorded
        .texts
        .iter()
        .find(|(name, _)| name == "is_draft")
        .map(|(_, value)| value.as_str());
    assert_eq!(is_draft, Some("true"));
    assert_eq!(recorded.attachment_names, vec!["scan.pdf", "report.pdf"]);
}

// ============================================================================
// Lists and notifications
// ============================================================================

async fn inbox_handler(headers: HeaderMap) -> impl IntoResponse {
    if bearer(&headers) != Some("abc") {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    // No data field at all: the client must treat this as an empty list
    Json(json!({ "status": "success" })).into_response()
}

#[tokio::test]
async fn missing_list_payload_reads_as_empty() {
    let origin =
        spawn_backend(Router::new().route("/api/transactions/inbox", get(inbox_handler))).await;
    let (_dir, state) = authed_state(&origin).await;

    let inbox = commands::inbox(&state).await.unwrap();
    assert!(inbox.is_empty());
}

async fn notifications_handler(headers: HeaderMap) -> impl IntoResponse {
    if bearer(&headers) != Some("abc") {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    Json(json!({
        "status": "success",
        "data": {
            "notifications": [{
                "notification_id": 11,
                "subject": "Update",
                "senderName": "Admin",
                "messageSnippet": "please review",
                "date": "2024-05-01T10:00:00Z",
                "is_read": false
            }],
            "unreadCount": 3
        }
    }))
    .into_response()
}

#[tokio::test]
async fn notifications_fetch_fills_both_cache_slots() {
    let origin =
        spawn_backend(Router::new().route("/api/notifications", get(notifications_handler))).await;
    let (_dir, state) = authed_state(&origin).await;

    let page = commands::notifications(&state, 1, 10).await.unwrap();
    assert_eq!(page.unread_count, 3);
    assert_eq!(page.notifications.len(), 1);
    assert_eq!(page.notifications[0].sender_name, "Admin");

    let app_state = state.read().await;
    assert_eq!(app_state.cache.unread_count(), Some(3));
    assert!(app_state.cache.notifications().is_some());
    drop(app_state);

    // A cached count is served without another request
    let count = commands::unread_count(&state).await.unwrap();
    assert_eq!(count, 3);
}

async fn mark_read_handler(Path(_id): Path<i64>, headers: HeaderMap) -> impl IntoResponse {
    if bearer(&headers) != Some("abc") {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    Json(json!({ "status": "success" })).into_response()
}

#[tokio::test]
async fn marking_read_invalidates_the_cache() {
    let app = Router::new()
        .route("/api/notifications", get(notifications_handler))
        .route("/api/notifications/{id}/read", put(mark_read_handler));
    let origin = spawn_backend(app).await;
    let (_dir, state) = authed_state(&origin).await;

    commands::notifications(&state, 1, 10).await.unwrap();
    assert_eq!(state.read().await.cache.unread_count(), Some(3));

    commands::mark_notification_read(&state, 11).await.unwrap();

    let app_state = state.read().await;
    assert_eq!(app_state.cache.unread_count(), None);
    assert!(app_state.cache.notifications().is_none());
}

//! Push channel tests: event delivery, cache invalidation, alert lifecycle

mod common;

use std::time::Duration;

use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use pretty_assertions::assert_eq;

use common::{client_state, sample_user, spawn_backend};
use tarasul_client::commands;
use tarasul_client::db;
use tarasul_client::models::NOTIFICATIONS_ROUTE;
use tarasul_client::push::{NotificationChannel, PushEvent};

const EVENT_BODY: &str = concat!(
    ": keep-alive\n",
    "\n",
    "data: {\"subject\":\"Update\",\"senderName\":\"Admin\",\"messageSnippet\":\"please review\"}\n",
    "\n",
);

async fn stream_handler(headers: HeaderMap) -> impl IntoResponse {
    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        == Some("Bearer abc");

    if !authorized {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    (
        [(header::CONTENT_TYPE, "text/event-stream")],
        EVENT_BODY,
    )
        .into_response()
}

fn stream_router() -> Router {
    Router::new().route("/api/notifications/stream", get(stream_handler))
}

#[tokio::test]
async fn channel_delivers_typed_events() {
    let origin = spawn_backend(stream_router()).await;
    let url = url::Url::parse(&format!("{}/api/notifications/stream", origin)).unwrap();

    let (channel, mut events) = NotificationChannel::connect(url, "abc".to_string());

    let event = tokio::time::timeout(Duration::from_secs(5), events.recv())
        .await
        .expect("event within timeout")
        .expect("channel open");

    let PushEvent::NewNotification(n) = event;
    assert_eq!(n.subject, "Update");
    assert_eq!(n.sender_name, "Admin");
    assert_eq!(n.message_snippet, "please review");

    channel.close();
}

#[tokio::test]
async fn push_event_invalidates_caches_and_raises_a_dismissible_alert() {
    let origin = spawn_backend(stream_router()).await;
    let (_dir, state) = client_state(&origin).await;

    {
        let app_state = state.read().await;
        db::save_session(&app_state.db, &sample_user(), "abc")
            .await
            .unwrap();
    }
    commands::restore_session(&state).await.unwrap();

    // Seed the cache so invalidation is observable
    state.write().await.cache.store_unread_count(5);

    commands::connect_push(&state).await.unwrap();

    // Wait for the consumer to process the pushed event
    let mut alerts = Vec::new();
    for _ in 0..100 {
        alerts = commands::alerts(&state).await;
        if !alerts.is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    assert!(!alerts.is_empty(), "no alert raised by push event");

    let alert = &alerts[0];
    assert_eq!(alert.subject, "Update");
    assert_eq!(alert.sender_name, "Admin");
    assert_eq!(alert.message_snippet, "please review");
    assert_eq!(alert.navigate_to, NOTIFICATIONS_ROUTE);

    // Both cached slots were discarded so the next render re-fetches
    {
        let app_state = state.read().await;
        assert_eq!(app_state.cache.unread_count(), None);
        assert!(app_state.cache.notifications().is_none());
    }

    // Stop the stream before exercising dismissal so no new event races in
    commands::logout(&state).await.unwrap();
    assert!(state.read().await.push.is_none());
}

#[tokio::test]
async fn dismissing_an_alert_removes_only_that_alert() {
    let origin = spawn_backend(stream_router()).await;
    let (_dir, state) = client_state(&origin).await;

    {
        let app_state = state.read().await;
        db::save_session(&app_state.db, &sample_user(), "abc")
            .await
            .unwrap();
    }
    commands::restore_session(&state).await.unwrap();
    commands::connect_push(&state).await.unwrap();

    let mut alerts = Vec::new();
    for _ in 0..100 {
        alerts = commands::alerts(&state).await;
        if !alerts.is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    assert!(!alerts.is_empty(), "no alert raised by push event");

    // Close the channel so the alert list is stable from here on
    {
        let mut app_state = state.write().await;
        if let Some(channel) = app_state.push.take() {
            channel.close();
        }
    }

    let alerts = commands::alerts(&state).await;
    let id = alerts[0].id;

    assert!(commands::dismiss_alert(&state, &id).await);
    assert!(!commands::dismiss_alert(&state, &id).await);

    let remaining = commands::alerts(&state).await;
    assert!(remaining.iter().all(|a| a.id != id));
}

//! Notification commands and the push-event consumer

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use super::{authed_client, settle};
use crate::error::AppResult;
use crate::models::{Alert, NotificationPage, NOTIFICATIONS_ROUTE};
use crate::push::{NotificationChannel, PushEvent};
use crate::state::SharedState;

/// Fetch one page of notifications and refresh both cached slots
pub async fn notifications(
    state: &SharedState,
    page: u32,
    limit: u32,
) -> AppResult<NotificationPage> {
    let (api, token) = authed_client(state).await?;
    let fetched = settle(state, api.notifications(page, limit, &token).await).await?;

    state
        .write()
        .await
        .cache
        .store_notifications(fetched.clone());

    Ok(fetched)
}

/// Unread count for the shell's badge: served from cache when valid,
/// otherwise fetched via a minimal page request.
pub async fn unread_count(state: &SharedState) -> AppResult<i64> {
    if let Some(count) = state.read().await.cache.unread_count() {
        return Ok(count);
    }

    let (api, token) = authed_client(state).await?;
    let page = settle(state, api.notifications(1, 1, &token).await).await?;

    state
        .write()
        .await
        .cache
        .store_unread_count(page.unread_count);

    Ok(page.unread_count)
}

/// Mark a notification read and invalidate the cached slots so the next
/// render re-fetches
pub async fn mark_notification_read(state: &SharedState, id: i64) -> AppResult<()> {
    let (api, token) = authed_client(state).await?;
    settle(state, api.mark_notification_read(id, &token).await).await?;

    state.write().await.cache.invalidate_notifications();
    Ok(())
}

/// Open the push channel for the current session and start the single
/// consumer that turns events into cache invalidations and alerts.
///
/// Call after entering `Authenticated`; the channel is closed automatically
/// on logout or session expiry.
pub async fn connect_push(state: &SharedState) -> AppResult<()> {
    let (push_url, token) = {
        let app_state = state.read().await;
        let session = app_state.require_auth()?;
        (app_state.push_url.clone(), session.token.clone())
    };

    let (channel, mut events) = NotificationChannel::connect(push_url, token);

    {
        let mut app_state = state.write().await;
        if let Some(previous) = app_state.push.take() {
            previous.close();
        }
        app_state.push = Some(channel);
    }

    let consumer_state = Arc::clone(state);
    tokio::spawn(async move {
        while let Some(PushEvent::NewNotification(incoming)) = events.recv().await {
            let mut app_state = consumer_state.write().await;
            app_state.cache.invalidate_notifications();
            app_state.alerts.push(Alert {
                id: Uuid::new_v4(),
                subject: incoming.subject,
                sender_name: incoming.sender_name,
                message_snippet: incoming.message_snippet,
                received_at: Utc::now(),
                navigate_to: NOTIFICATIONS_ROUTE,
            });
            tracing::info!("New notification pushed; caches invalidated");
        }
    });

    Ok(())
}

/// Pending alerts, newest last. Alerts stay until dismissed.
pub async fn alerts(state: &SharedState) -> Vec<Alert> {
    state.read().await.alerts.clone()
}

/// Dismiss one alert by id. Returns false when it was already gone.
pub async fn dismiss_alert(state: &SharedState, id: &Uuid) -> bool {
    let mut app_state = state.write().await;
    let before = app_state.alerts.len();
    app_state.alerts.retain(|a| a.id != *id);
    app_state.alerts.len() != before
}

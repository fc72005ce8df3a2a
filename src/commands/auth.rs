//! Authentication commands

use crate::api::ApiClient;
use crate::db;
use crate::error::AppResult;
use crate::models::{LoginOutcome, User};
use crate::state::{AuthPhase, SharedState};

/// Restore the session from the local store on startup.
///
/// Reads the store once and transitions synchronously: `Authenticated` when
/// a token and user are both present, `Anonymous` otherwise. No network call
/// is made; a stale token surfaces later as a 401 on the first real request.
pub async fn restore_session(state: &SharedState) -> AppResult<Option<User>> {
    let mut app_state = state.write().await;
    app_state.phase = AuthPhase::Restoring;

    match db::load_session(&app_state.db).await {
        Ok(Some((token, user))) => {
            app_state.set_session(user.clone(), token);
            tracing::info!("Session restored for user: {}", user.user_id);
            Ok(Some(user))
        }
        Ok(None) => {
            app_state.phase = AuthPhase::Anonymous;
            Ok(None)
        }
        Err(e) => {
            // Unreadable store means "logged out", never a hard failure
            tracing::error!("Failed to read persisted session: {}", e);
            app_state.phase = AuthPhase::Anonymous;
            Ok(None)
        }
    }
}

/// Log in with email and password.
///
/// On success the session is persisted and the client becomes
/// `Authenticated`. On failure the typed error propagates and the phase is
/// untouched, leaving the caller to display it. The
/// `requires_profile_update` flag on the outcome is the shell's cue to
/// redirect to the profile view first.
pub async fn login(state: &SharedState, email: &str, password: &str) -> AppResult<LoginOutcome> {
    let (api, pool) = {
        let app_state = state.read().await;
        (ApiClient::new(app_state.api_url.clone()), app_state.db.clone())
    };

    let outcome = api.login(email, password).await?;

    if let Err(e) = db::save_session(&pool, &outcome.user, &outcome.token).await {
        tracing::error!("Failed to persist session: {}", e);
    }

    let mut app_state = state.write().await;
    app_state.set_session(outcome.user.clone(), outcome.token.clone());
    tracing::info!("User logged in: {}", outcome.user.user_id);

    Ok(outcome)
}

/// Log out: clear the store, drop the in-memory session, close the push
/// channel.
pub async fn logout(state: &SharedState) -> AppResult<()> {
    let mut app_state = state.write().await;

    if let Err(e) = db::clear_sessions(&app_state.db).await {
        tracing::error!("Failed to clear sessions: {}", e);
    }

    app_state.clear_session();
    tracing::info!("User logged out");
    Ok(())
}

/// Current user from the in-memory session, if authenticated
pub async fn current_user(state: &SharedState) -> Option<User> {
    state.read().await.user().cloned()
}

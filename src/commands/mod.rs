//! Shell-facing operations
//!
//! All UI-to-core calls go through these functions. Every authenticated
//! command short-circuits with `NotAuthenticated` before touching the
//! network, and routes a server-declared 401 through
//! [`crate::state::expire_session`] exactly once before surfacing it.

pub mod auth;
pub mod notifications;
pub mod profile;
pub mod settings;
pub mod transactions;

pub use auth::*;
pub use notifications::*;
pub use profile::*;
pub use settings::*;
pub use transactions::*;

use crate::api::ApiClient;
use crate::error::{AppError, AppResult};
use crate::state::{self, SharedState};

/// Build an API client and borrow the session token, failing fast with
/// `NotAuthenticated` when no session exists.
pub(crate) async fn authed_client(state: &SharedState) -> AppResult<(ApiClient, String)> {
    let app_state = state.read().await;
    let session = app_state.require_auth()?;
    Ok((
        ApiClient::new(app_state.api_url.clone()),
        session.token.clone(),
    ))
}

/// Apply the mandatory 401 side effect: on `SessionExpired` the persisted
/// store is cleared and the session manager drops to `Anonymous` before the
/// error reaches the caller.
pub(crate) async fn settle<T>(state: &SharedState, result: AppResult<T>) -> AppResult<T> {
    if let Err(AppError::SessionExpired) = &result {
        state::expire_session(state).await;
    }
    result
}

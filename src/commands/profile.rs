//! Profile commands

use super::{authed_client, settle};
use crate::error::AppResult;
use crate::models::{ApiMessage, ProfileUpdate, UserProfile};
use crate::state::SharedState;

/// Fetch the current user's profile
pub async fn fetch_profile(state: &SharedState) -> AppResult<UserProfile> {
    let (api, token) = authed_client(state).await?;
    settle(state, api.fetch_profile(&token).await).await
}

/// Update the current user's profile. Only the fields present on `update`
/// are sent; the backend leaves the rest untouched.
pub async fn update_profile(state: &SharedState, update: &ProfileUpdate) -> AppResult<ApiMessage> {
    let (api, token) = authed_client(state).await?;
    settle(state, api.update_profile(update, &token).await).await
}

//! Settings commands

use crate::db;
use crate::error::AppResult;
use crate::models::Settings;
use crate::state::SharedState;

/// Read client settings from the local store
pub async fn get_settings(state: &SharedState) -> AppResult<Settings> {
    let pool = state.read().await.db.clone();
    db::get_settings(&pool).await
}

/// Persist client settings
pub async fn update_settings(state: &SharedState, settings: &Settings) -> AppResult<Settings> {
    let pool = state.read().await.db.clone();
    db::update_settings(&pool, settings).await?;
    Ok(settings.clone())
}

/// Reset client settings to defaults
pub async fn reset_settings(state: &SharedState) -> AppResult<Settings> {
    let pool = state.read().await.db.clone();
    db::reset_settings(&pool).await?;
    Ok(Settings::default())
}

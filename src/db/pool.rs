//! Database pool and query utilities

use sqlx::SqlitePool;

use crate::error::AppResult;
use crate::models::{Language, Settings, User};

/// Open the local store, enabling WAL mode and running migrations.
pub async fn open(db_path: &str) -> AppResult<SqlitePool> {
    let db_url = format!("sqlite:{}?mode=rwc", db_path);
    let pool = SqlitePool::connect(&db_url).await?;

    // WAL keeps the store readable while a write is in flight
    sqlx::query("PRAGMA journal_mode=WAL;").execute(&pool).await?;
    sqlx::query("PRAGMA synchronous=NORMAL;").execute(&pool).await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    tracing::info!("Local store initialized at: {}", db_path);

    Ok(pool)
}

// ============================================================================
// Session Queries
// ============================================================================

/// Persist a session, replacing any previous one.
///
/// Token and serialized user are written in a single transaction so the
/// store never holds one without the other.
pub async fn save_session(pool: &SqlitePool, user: &User, token: &str) -> AppResult<String> {
    let id = uuid::Uuid::new_v4().to_string();
    let user_json = serde_json::to_string(user)?;

    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM sessions").execute(&mut *tx).await?;

    sqlx::query(
        r#"
        INSERT INTO sessions (id, token, user_json)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(token)
    .bind(&user_json)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(id)
}

/// Read the persisted session, if any.
///
/// An absent row means "logged out" and is not an error. A row whose user
/// record no longer parses is treated the same way: the store fails closed
/// rather than surfacing corrupt state.
pub async fn load_session(pool: &SqlitePool) -> AppResult<Option<(String, User)>> {
    let row = sqlx::query_as::<_, (String, String)>(
        r#"
        SELECT token, user_json
        FROM sessions
        ORDER BY created_at DESC
        LIMIT 1
        "#,
    )
    .fetch_optional(pool)
    .await?;

    let Some((token, user_json)) = row else {
        return Ok(None);
    };

    match serde_json::from_str::<User>(&user_json) {
        Ok(user) => Ok(Some((token, user))),
        Err(e) => {
            tracing::warn!("Discarding unreadable persisted session: {}", e);
            Ok(None)
        }
    }
}

/// Delete all sessions
pub async fn clear_sessions(pool: &SqlitePool) -> AppResult<()> {
    sqlx::query("DELETE FROM sessions").execute(pool).await?;
    Ok(())
}

// ============================================================================
// Settings Queries
// ============================================================================

/// Get all settings
pub async fn get_settings(pool: &SqlitePool) -> AppResult<Settings> {
    let rows = sqlx::query_as::<_, (String, String)>("SELECT key, value FROM settings")
        .fetch_all(pool)
        .await?;

    let mut settings = Settings::default();

    for (key, value) in rows {
        match key.as_str() {
            "notifications_enabled" => {
                if let Ok(v) = serde_json::from_str::<bool>(&value) {
                    settings.notifications_enabled = v;
                }
            }
            "sound_enabled" => {
                if let Ok(v) = serde_json::from_str::<bool>(&value) {
                    settings.sound_enabled = v;
                }
            }
            "language" => {
                if let Ok(v) = serde_json::from_str::<Language>(&value) {
                    settings.language = v;
                }
            }
            _ => {}
        }
    }

    Ok(settings)
}

/// Update a single setting
pub async fn update_setting(pool: &SqlitePool, key: &str, value: &str) -> AppResult<()> {
    sqlx::query(
        r#"
        INSERT INTO settings (key, value, updated_at)
        VALUES (?, ?, datetime('now'))
        ON CONFLICT(key) DO UPDATE SET
            value = excluded.value,
            updated_at = datetime('now')
        "#,
    )
    .bind(key)
    .bind(value)
    .execute(pool)
    .await?;

    Ok(())
}

/// Update all settings
pub async fn update_settings(pool: &SqlitePool, settings: &Settings) -> AppResult<()> {
    update_setting(
        pool,
        "notifications_enabled",
        &serde_json::to_string(&settings.notifications_enabled)?,
    )
    .await?;
    update_setting(
        pool,
        "sound_enabled",
        &serde_json::to_string(&settings.sound_enabled)?,
    )
    .await?;
    update_setting(pool, "language", &serde_json::to_string(&settings.language)?).await?;

    Ok(())
}

/// Drop all stored settings, reverting to defaults
pub async fn reset_settings(pool: &SqlitePool) -> AppResult<()> {
    sqlx::query("DELETE FROM settings").execute(pool).await?;
    Ok(())
}

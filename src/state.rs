//! Application state management
//!
//! Uses Arc<RwLock<>> for thread-safe concurrent access to shared state.
//! The Rust core maintains the single source of truth; the rendering shell
//! only reads through the commands layer.

use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::RwLock;
use url::Url;

use crate::cache::QueryCache;
use crate::config::Config;
use crate::db;
use crate::error::{AppError, AppResult};
use crate::models::{Alert, User};
use crate::push::NotificationChannel;

/// Auth lifecycle of the client.
///
/// `Uninitialized` before the shell's first render, `Restoring` while the
/// persisted store is being read, then `Authenticated` or `Anonymous`. There
/// is no token refresh; expiry is discovered lazily via 401 responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPhase {
    Uninitialized,
    Restoring,
    Authenticated,
    Anonymous,
}

/// In-memory session: the token and the user it authorizes, always together
#[derive(Debug, Clone)]
pub struct UserSession {
    pub token: String,
    pub user: User,
}

/// Global application state
pub struct AppState {
    /// Local store (persisted session + settings)
    pub db: SqlitePool,

    /// Backend REST origin
    pub api_url: Url,

    /// Push stream endpoint
    pub push_url: Url,

    /// Where the client is in the auth lifecycle
    pub phase: AuthPhase,

    /// Current session (None unless `phase` is Authenticated)
    pub session: Option<UserSession>,

    /// Cached query results the push channel may invalidate
    pub cache: QueryCache,

    /// Transient, dismissible alerts raised by push events
    pub alerts: Vec<Alert>,

    /// Open push channel, if any
    pub push: Option<NotificationChannel>,
}

impl AppState {
    /// Create new application state, opening the local store
    pub async fn new(db_path: &str, config: Config) -> AppResult<Self> {
        let db = db::open(db_path).await?;
        let push_url = config.push_url();

        Ok(Self {
            db,
            api_url: config.api_url,
            push_url,
            phase: AuthPhase::Uninitialized,
            session: None,
            cache: QueryCache::default(),
            alerts: Vec::new(),
            push: None,
        })
    }

    /// Check if user is authenticated
    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    /// Get current auth token if authenticated
    pub fn token(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.token.as_str())
    }

    /// Get current user if authenticated
    pub fn user(&self) -> Option<&User> {
        self.session.as_ref().map(|s| &s.user)
    }

    /// Set user session after successful authentication
    pub fn set_session(&mut self, user: User, token: String) {
        self.session = Some(UserSession { token, user });
        self.phase = AuthPhase::Authenticated;
    }

    /// Drop the in-memory session and everything scoped to it: the push
    /// channel, cached queries, and pending alerts.
    pub fn clear_session(&mut self) {
        if let Some(channel) = self.push.take() {
            channel.close();
        }
        self.session = None;
        self.cache.invalidate_notifications();
        self.alerts.clear();
        self.phase = AuthPhase::Anonymous;
    }

    /// Require authentication, returning error if not authenticated
    pub fn require_auth(&self) -> AppResult<&UserSession> {
        self.session.as_ref().ok_or(AppError::NotAuthenticated)
    }
}

/// Thread-safe shared state type
pub type SharedState = Arc<RwLock<AppState>>;

/// Create a new shared state instance
pub async fn create_shared_state(db_path: &str, config: Config) -> AppResult<SharedState> {
    let state = AppState::new(db_path, config).await?;
    Ok(Arc::new(RwLock::new(state)))
}

/// Forced logout after a server-declared 401.
///
/// Clears the persisted store first, then the in-memory session. Every
/// authenticated command routes `SessionExpired` through here exactly once
/// before surfacing the error.
pub async fn expire_session(state: &SharedState) {
    let mut app_state = state.write().await;

    if let Err(e) = db::clear_sessions(&app_state.db).await {
        tracing::error!("Failed to clear expired session from store: {}", e);
    }

    app_state.clear_session();
    tracing::info!("Session expired; local session cleared");
}

//! Error types for the Tarasul client core

use thiserror::Error;

/// Fallback shown when the backend returns a failure without a usable
/// `message` field. The backend speaks Arabic to its users, so the generic
/// fallback does too.
pub const GENERIC_REQUEST_FAILURE: &str = "فشل في تنفيذ الطلب";

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// No token is present locally. The request is never attempted.
    #[error("غير مسجل الدخول")]
    NotAuthenticated,

    /// The backend answered 401. The persisted session is cleared before
    /// this surfaces to the caller.
    #[error("انتهت صلاحية الجلسة")]
    SessionExpired,

    /// Any other non-2xx response. Carries the server's `message` when one
    /// was present, otherwise [`GENERIC_REQUEST_FAILURE`].
    #[error("{0}")]
    Request(String),

    /// Transport-level failure (DNS, timeout, connection reset).
    #[error("تعذر الاتصال بالخادم: {0}")]
    Network(#[from] reqwest::Error),

    /// Local form validation. Never sent to the network.
    #[error("{0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

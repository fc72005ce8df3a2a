//! Tarasul client core
//!
//! The headless core of the Tarasul desktop client: an institutional
//! document-routing system where users authenticate, compose and send
//! multi-recipient transactions with attachments, track routing state, and
//! receive near-real-time notifications. All session management, API access,
//! persistence, and push plumbing live here; a rendering shell binds to the
//! [`commands`] module and owns nothing but presentation.
//!
//! The backend owns every workflow state machine. This crate renders and
//! forwards: its caches are invalidate-and-refetch, its errors are typed and
//! terminal per attempt, and its only durable state is the persisted session
//! and client settings.

pub mod api;
pub mod cache;
pub mod commands;
pub mod compose;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod push;
pub mod state;

/// Initialize logging. The shell calls this once at startup.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tarasul_client=info".into()),
        )
        .init();
}

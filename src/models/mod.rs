//! Data models for the Tarasul client core
//!
//! These types mirror the backend wire contract and are shared between the
//! API client, the local store, and the shell-facing commands.

mod types;

pub use types::*;

//! Local persistence for the Tarasul client core
//!
//! A small SQLite database standing in for the browser-local storage of the
//! web client: it holds the persisted session (token + user record) and
//! client settings, nothing else. All transaction and notification data is
//! re-fetched from the backend on every view mount.

mod pool;

pub use pool::*;

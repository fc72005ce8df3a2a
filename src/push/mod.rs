//! Push notification channel
//!
//! A persistent, token-authenticated event stream from the backend. The
//! channel is a producer of typed events; a single consumer (spawned by the
//! commands layer) invalidates cached queries and raises alerts.

mod channel;

pub use channel::{NewNotification, NotificationChannel, PushEvent};

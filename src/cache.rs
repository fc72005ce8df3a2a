//! Client-side query cache
//!
//! Holds exactly the two results the push channel invalidates: the last
//! fetched notifications page and the unread count. Invalidation discards the
//! cached value so the next read re-fetches current server state; nothing is
//! ever merged in place. Transaction lists and details are deliberately not
//! cached - they are re-fetched on every view mount.

use crate::models::NotificationPage;

/// Cached query results, owned by [`crate::state::AppState`]
#[derive(Debug, Default)]
pub struct QueryCache {
    notifications: Option<NotificationPage>,
    unread_count: Option<i64>,
}

impl QueryCache {
    /// Last fetched notifications page, if still valid
    pub fn notifications(&self) -> Option<&NotificationPage> {
        self.notifications.as_ref()
    }

    /// Last known unread count, if still valid
    pub fn unread_count(&self) -> Option<i64> {
        self.unread_count
    }

    /// Record a fetched notifications page. The page carries the unread
    /// count, so both slots refresh together.
    pub fn store_notifications(&mut self, page: NotificationPage) {
        self.unread_count = Some(page.unread_count);
        self.notifications = Some(page);
    }

    /// Record an unread count fetched on its own
    pub fn store_unread_count(&mut self, count: i64) {
        self.unread_count = Some(count);
    }

    /// Discard both notification slots so the next render re-fetches
    pub fn invalidate_notifications(&mut self) {
        self.notifications = None;
        self.unread_count = None;
    }
}

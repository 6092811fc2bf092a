//! Notification inbox and transient toast projection.
//!
//! Every creation event has two projections: a durable inbox entry (persists
//! until explicitly marked read) and a toast that the store layer removes
//! after [`TOAST_TTL`]. Toast removal never touches the inbox.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How long a toast stays visible before it is scheduled away.
pub const TOAST_TTL: Duration = Duration::from_millis(4000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppNotification {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub read: bool,
}

/// Durable notification list plus the toast id projection.
///
/// Invariant: every toast id refers to an entry in `items` at creation time;
/// expiring a toast leaves the inbox entry in place.
#[derive(Debug, Default)]
pub struct Inbox {
    items: Vec<AppNotification>,
    toasts: Vec<Uuid>,
}

impl Inbox {
    /// Creates one notification: prepends it unread to the durable list and
    /// pushes its id onto the toast projection. The caller schedules removal.
    pub fn push(
        &mut self,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> AppNotification {
        let notification = AppNotification {
            id: Uuid::new_v4(),
            kind,
            title: title.into(),
            message: message.into(),
            timestamp: Utc::now(),
            read: false,
        };
        self.items.insert(0, notification.clone());
        self.toasts.push(notification.id);
        notification
    }

    /// Removes `id` from the toast projection only.
    pub fn remove_toast(&mut self, id: Uuid) {
        self.toasts.retain(|t| *t != id);
    }

    pub fn mark_all_read(&mut self) {
        for item in &mut self.items {
            item.read = true;
        }
    }

    pub fn items(&self) -> &[AppNotification] {
        &self.items
    }

    pub fn unread_count(&self) -> usize {
        self.items.iter().filter(|n| !n.read).count()
    }

    /// The currently visible toasts, resolved against the durable list.
    pub fn active_toasts(&self) -> Vec<AppNotification> {
        self.toasts
            .iter()
            .filter_map(|id| self.items.iter().find(|n| n.id == *id))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_creates_both_projections() {
        let mut inbox = Inbox::default();
        let n = inbox.push(NotificationKind::Info, "Deposit Logged", "Processing.");
        assert_eq!(inbox.items().len(), 1);
        assert_eq!(inbox.active_toasts().len(), 1);
        assert_eq!(inbox.active_toasts()[0].id, n.id);
        assert!(!inbox.items()[0].read);
    }

    #[test]
    fn test_newest_first_ordering() {
        let mut inbox = Inbox::default();
        inbox.push(NotificationKind::Info, "first", "");
        inbox.push(NotificationKind::Success, "second", "");
        assert_eq!(inbox.items()[0].title, "second");
        assert_eq!(inbox.items()[1].title, "first");
    }

    #[test]
    fn test_remove_toast_keeps_inbox_entry() {
        let mut inbox = Inbox::default();
        let n = inbox.push(NotificationKind::Warning, "File too large", "");
        inbox.remove_toast(n.id);
        assert!(inbox.active_toasts().is_empty());
        assert_eq!(inbox.items().len(), 1);
    }

    #[test]
    fn test_mark_all_read_does_not_touch_toasts() {
        let mut inbox = Inbox::default();
        inbox.push(NotificationKind::Info, "a", "");
        inbox.push(NotificationKind::Error, "b", "");
        inbox.mark_all_read();
        assert_eq!(inbox.unread_count(), 0);
        assert_eq!(inbox.active_toasts().len(), 2);
    }
}

//! Notification Store
//!
//! In-memory notification list plus the unread counter shown on the badge.

use crate::notification::{Notification, NotificationFilter};

/// Notifications currently held by the dashboard and the unread counter.
///
/// The counter is resynced from the backend on every load and adjusted
/// locally by the mark-read actions. It never goes below zero.
#[derive(Debug, Clone, Default)]
pub struct NotificationStore {
    notifications: Vec<Notification>,
    unread_count: u64,
}

impl NotificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn unread_count(&self) -> u64 {
        self.unread_count
    }

    pub fn is_empty(&self) -> bool {
        self.notifications.is_empty()
    }

    pub fn get(&self, id: i64) -> Option<&Notification> {
        self.notifications.iter().find(|n| n.id == id)
    }

    /// Replace the notification list with a freshly fetched one
    pub fn replace_notifications(&mut self, notifications: Vec<Notification>) {
        self.notifications = notifications;
    }

    /// Replace the counter with the backend's value
    pub fn set_unread_count(&mut self, count: u64) {
        self.unread_count = count;
    }

    /// Flag one notification read and decrement the counter, floored at 0.
    ///
    /// Returns whether a notification with that id was held locally. The
    /// counter is decremented either way since it tracks the backend total,
    /// not just the fetched page.
    pub fn mark_read(&mut self, id: i64) -> bool {
        let found = match self.notifications.iter_mut().find(|n| n.id == id) {
            Some(notification) => {
                notification.is_read = true;
                true
            }
            None => false,
        };
        self.unread_count = self.unread_count.saturating_sub(1);
        found
    }

    /// Flag every notification read and zero the counter
    pub fn mark_all_read(&mut self) {
        for notification in &mut self.notifications {
            notification.is_read = true;
        }
        self.unread_count = 0;
    }

    /// Notifications passing `mode`, in fetch order
    pub fn filtered(&self, mode: NotificationFilter) -> Vec<&Notification> {
        filter(&self.notifications, mode)
    }
}

/// Select the notifications shown for a filter tab.
///
/// `Unread` keeps unread ones, `High` keeps HIGH priority ones and `All`
/// passes everything through. Filters never combine.
pub fn filter(notifications: &[Notification], mode: NotificationFilter) -> Vec<&Notification> {
    notifications
        .iter()
        .filter(|n| match mode {
            NotificationFilter::All => true,
            NotificationFilter::Unread => !n.is_read,
            NotificationFilter::High => n.is_high_priority(),
        })
        .collect()
}

//! Session notification store.
//!
//! # Responsibility
//! - Hold every in-session notification, most recent first.
//! - Apply read-state mutations and bulk clear.
//! - Publish change events to subscribers (toast surface, badges).
//!
//! # Invariants
//! - Sequence order is strictly descending by `NotificationId`.
//! - `unread_count()` always equals the number of entries with `read == false`.
//! - No operation can fail; unknown ids are no-ops.
//! - Log events carry ids and counts only, never titles or messages.

use crate::model::notification::{Notification, NotificationId, NotificationKind};
use crate::time::now_epoch_ms;
use log::debug;
use std::collections::VecDeque;
use std::sync::mpsc::{channel, Receiver, Sender};

/// Number of entries shown in the sidebar notification menu.
pub const SIDEBAR_PREVIEW_LIMIT: usize = 5;

/// Change published to store subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationEvent {
    /// A notification was prepended; toast surfaces render it.
    Added(Notification),
    Read(NotificationId),
    AllRead,
    Cleared,
}

/// Sidebar projection of the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarDigest {
    /// `None` hides the badge.
    pub unread_badge: Option<usize>,
    /// Most recent entries, at most the requested limit.
    pub recent: Vec<Notification>,
    /// Entries not included in `recent`.
    pub overflow: usize,
}

/// Owned notification service.
///
/// One instance lives for the whole session and is handed by reference to
/// every producer and consumer.
#[derive(Debug, Default)]
pub struct NotificationStore {
    entries: VecDeque<Notification>,
    last_id: u64,
    subscribers: Vec<Sender<NotificationEvent>>,
}

impl NotificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepends a new unread notification stamped with the current time.
    pub fn add(
        &mut self,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> NotificationId {
        self.add_at(kind, title, message, now_epoch_ms())
    }

    /// Prepends a new unread notification with a caller-provided timestamp.
    ///
    /// Ordering follows creation order, not `created_at_ms`.
    pub fn add_at(
        &mut self,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
        created_at_ms: i64,
    ) -> NotificationId {
        self.last_id += 1;
        let id = NotificationId::from_sequence(self.last_id);
        let notification = Notification::new(id, kind, title, message, created_at_ms);

        self.entries.push_front(notification.clone());
        debug!(
            "event=notification_add module=notify status=ok id={} kind={} unread={}",
            id,
            kind.as_str(),
            self.unread_count()
        );
        self.publish(NotificationEvent::Added(notification));
        id
    }

    /// Marks one notification read. Returns whether anything changed.
    pub fn mark_read(&mut self, id: NotificationId) -> bool {
        let Some(entry) = self.entries.iter_mut().find(|entry| entry.id == id) else {
            return false;
        };
        if entry.read {
            return false;
        }

        entry.read = true;
        debug!(
            "event=notification_read module=notify status=ok id={} unread={}",
            id,
            self.unread_count()
        );
        self.publish(NotificationEvent::Read(id));
        true
    }

    pub fn mark_all_read(&mut self) {
        let mut changed = 0usize;
        for entry in self.entries.iter_mut().filter(|entry| !entry.read) {
            entry.read = true;
            changed += 1;
        }
        debug!("event=notification_read_all module=notify status=ok changed={changed}");
        self.publish(NotificationEvent::AllRead);
    }

    pub fn clear(&mut self) {
        let removed = self.entries.len();
        self.entries.clear();
        debug!("event=notification_clear module=notify status=ok removed={removed}");
        self.publish(NotificationEvent::Cleared);
    }

    /// Count of unread entries, recomputed on every call.
    pub fn unread_count(&self) -> usize {
        self.entries.iter().filter(|entry| entry.is_unread()).count()
    }

    /// Entries, most recent first.
    pub fn notifications(&self) -> impl ExactSizeIterator<Item = &Notification> + '_ {
        self.entries.iter()
    }

    /// Owned copy of the current sequence, most recent first.
    pub fn snapshot(&self) -> Vec<Notification> {
        self.entries.iter().cloned().collect()
    }

    pub fn latest(&self) -> Option<&Notification> {
        self.entries.front()
    }

    pub fn get(&self, id: NotificationId) -> Option<&Notification> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Builds the sidebar badge and menu preview.
    pub fn digest(&self, limit: usize) -> SidebarDigest {
        let unread = self.unread_count();
        SidebarDigest {
            unread_badge: (unread > 0).then_some(unread),
            recent: self.entries.iter().take(limit).cloned().collect(),
            overflow: self.entries.len().saturating_sub(limit),
        }
    }

    /// Registers a subscriber for change events.
    ///
    /// Events published before subscribing are not replayed. Dropping the
    /// receiver unsubscribes on the next publish.
    pub fn subscribe(&mut self) -> Receiver<NotificationEvent> {
        let (tx, rx) = channel();
        self.subscribers.push(tx);
        rx
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    fn publish(&mut self, event: NotificationEvent) {
        self.subscribers
            .retain(|subscriber| subscriber.send(event.clone()).is_ok());
    }
}

//! Transient toast surface fed by store events.

use crate::model::notification::{Notification, NotificationKind};
use crate::notify::store::NotificationEvent;
use serde::Serialize;
use std::sync::mpsc::Receiver;
use std::time::Duration;

/// Visual variant of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToastVariant {
    Default,
    Destructive,
}

impl From<NotificationKind> for ToastVariant {
    fn from(kind: NotificationKind) -> Self {
        match kind {
            NotificationKind::Error => Self::Destructive,
            _ => Self::Default,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub title: String,
    pub description: String,
    pub variant: ToastVariant,
    /// Epoch milliseconds after which the toast is hidden.
    pub expires_at_ms: i64,
}

/// Holds at most one visible toast: the most recent one.
#[derive(Debug)]
pub struct ToastSurface {
    ttl_ms: i64,
    current: Option<Toast>,
    shown: u64,
}

impl ToastSurface {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl_ms: i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX),
            current: None,
            shown: 0,
        }
    }

    /// Shows a toast for `Added` events; other events are ignored.
    pub fn observe(&mut self, event: &NotificationEvent, now_ms: i64) {
        if let NotificationEvent::Added(notification) = event {
            self.show(notification, now_ms);
        }
    }

    /// Drains pending events from a store subscription.
    ///
    /// Returns the number of events consumed.
    pub fn drain(&mut self, events: &Receiver<NotificationEvent>, now_ms: i64) -> usize {
        let mut consumed = 0;
        while let Ok(event) = events.try_recv() {
            self.observe(&event, now_ms);
            consumed += 1;
        }
        consumed
    }

    pub fn show(&mut self, notification: &Notification, now_ms: i64) {
        self.flash(
            notification.title.clone(),
            notification.message.clone(),
            notification.kind.into(),
            now_ms,
        );
    }

    /// Shows a toast that is not backed by a stored notification.
    pub fn flash(
        &mut self,
        title: impl Into<String>,
        description: impl Into<String>,
        variant: ToastVariant,
        now_ms: i64,
    ) {
        self.current = Some(Toast {
            title: title.into(),
            description: description.into(),
            variant,
            expires_at_ms: now_ms.saturating_add(self.ttl_ms),
        });
        self.shown += 1;
    }

    /// Visible toast at `now_ms`, if it has not expired.
    pub fn current(&self, now_ms: i64) -> Option<&Toast> {
        self.current
            .as_ref()
            .filter(|toast| now_ms < toast.expires_at_ms)
    }

    pub fn dismiss(&mut self) {
        self.current = None;
    }

    /// Total toasts shown this session.
    pub fn shown_count(&self) -> u64 {
        self.shown
    }
}

#[cfg(test)]
mod tests {
    use super::{ToastSurface, ToastVariant};
    use crate::model::notification::NotificationKind;
    use crate::notify::store::NotificationStore;
    use std::time::Duration;

    #[test]
    fn latest_added_notification_replaces_previous_toast() {
        let mut store = NotificationStore::new();
        let events = store.subscribe();
        let mut toasts = ToastSurface::new(Duration::from_secs(5));

        store.add_at(NotificationKind::Info, "System Update", "a", 0);
        store.add_at(NotificationKind::Error, "Connection Issue", "b", 0);
        store.mark_all_read();
        assert_eq!(toasts.drain(&events, 1_000), 3);

        let toast = toasts.current(1_000).expect("toast should be visible");
        assert_eq!(toast.title, "Connection Issue");
        assert_eq!(toast.variant, ToastVariant::Destructive);
        assert_eq!(toasts.shown_count(), 2);
    }

    #[test]
    fn toast_expires_after_ttl_and_can_be_dismissed() {
        let mut store = NotificationStore::new();
        let events = store.subscribe();
        let mut toasts = ToastSurface::new(Duration::from_millis(500));

        store.add_at(NotificationKind::Success, "Export Complete", "done", 0);
        toasts.drain(&events, 100);
        assert!(toasts.current(599).is_some());
        assert!(toasts.current(600).is_none());

        toasts.dismiss();
        assert!(toasts.current(100).is_none());
    }
}

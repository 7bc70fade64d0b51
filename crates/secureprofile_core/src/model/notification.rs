//! Notification domain model.
//!
//! # Responsibility
//! - Define the in-session alert record shown by the sidebar and toasts.
//! - Keep read-state as the only mutable part of a notification.
//!
//! # Invariants
//! - `id` is unique within a session and increases with creation order.
//! - Notifications are never deleted individually, only bulk-cleared.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Session-unique, creation-ordered notification identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationId(u64);

impl NotificationId {
    pub(crate) fn from_sequence(value: u64) -> Self {
        Self(value)
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl Display for NotificationId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Severity category of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Info,
    Warning,
    Success,
    Error,
}

impl NotificationKind {
    pub const ALL: [NotificationKind; 4] = [
        NotificationKind::Info,
        NotificationKind::Warning,
        NotificationKind::Success,
        NotificationKind::Error,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Success => "success",
            Self::Error => "error",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "info" => Some(Self::Info),
            "warning" | "warn" => Some(Self::Warning),
            "success" => Some(Self::Success),
            "error" => Some(Self::Error),
            _ => None,
        }
    }
}

/// One alert tracked for read/unread state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    /// Serialized as `type` to match the dashboard's naming.
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub read: bool,
    /// Unix epoch milliseconds.
    pub created_at_ms: i64,
}

impl Notification {
    pub(crate) fn new(
        id: NotificationId,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
        created_at_ms: i64,
    ) -> Self {
        Self {
            id,
            kind,
            title: title.into(),
            message: message.into(),
            read: false,
            created_at_ms,
        }
    }

    pub fn is_unread(&self) -> bool {
        !self.read
    }
}

//! Activity feed records.

use serde::{Deserialize, Serialize};

/// Category of a feed entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Login,
    Profile,
    Search,
    Alert,
    System,
}

impl ActivityKind {
    pub const ALL: [ActivityKind; 5] = [
        ActivityKind::Login,
        ActivityKind::Profile,
        ActivityKind::Search,
        ActivityKind::Alert,
        ActivityKind::System,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Profile => "profile",
            Self::Search => "search",
            Self::Alert => "alert",
            Self::System => "system",
        }
    }

    /// Canned messages the simulated feed picks from.
    pub fn sample_messages(self) -> &'static [&'static str] {
        match self {
            Self::Login => &[
                "User admin logged in",
                "User operator1 logged in",
                "User analyst2 logged in",
            ],
            Self::Profile => &[
                "New profile created",
                "Profile #1248 updated",
                "Profile #1242 exported",
            ],
            Self::Search => &[
                "Search performed: 'Khan'",
                "Advanced search executed",
                "Location search: 'North Sector'",
            ],
            Self::Alert => &[
                "Security alert: Failed login attempt",
                "System alert: High CPU usage",
                "Data alert: Duplicate entry detected",
            ],
            Self::System => &[
                "System backup completed",
                "Database optimization complete",
                "Cache cleared successfully",
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEvent {
    pub id: u64,
    pub kind: ActivityKind,
    pub message: String,
    /// Unix epoch milliseconds.
    pub at_ms: i64,
}

//! Dashboard statistic records.
//!
//! All values are mock figures; bounds are enforced by the feeds that
//! mutate them.

use serde::{Deserialize, Serialize};

/// Headline counters of the command-center page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_profiles: u32,
    pub new_entries: u32,
    pub active_cases: u32,
    pub entry_points: u32,
    /// Percentage, kept within `30..=95`.
    pub system_load: u32,
    /// Terabytes processed, one decimal place.
    pub data_processed: f64,
    pub uptime: String,
    pub security_level: String,
    pub active_users: u32,
}

impl Default for DashboardStats {
    fn default() -> Self {
        Self {
            total_profiles: 1248,
            new_entries: 42,
            active_cases: 89,
            entry_points: 24,
            system_load: 42,
            data_processed: 1.7,
            uptime: "99.98%".to_string(),
            security_level: "High".to_string(),
            active_users: 42,
        }
    }
}

/// One marker on the entry-point map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryPoint {
    pub name: String,
    pub x: u32,
    pub y: u32,
    pub count: u32,
    pub active: bool,
}

impl EntryPoint {
    pub fn new(name: &str, x: u32, y: u32, count: u32) -> Self {
        Self {
            name: name.to_string(),
            x,
            y,
            count,
            active: true,
        }
    }

    /// Initial map markers.
    pub fn defaults() -> Vec<EntryPoint> {
        vec![
            EntryPoint::new("North Sector", 100, 80, 25),
            EntryPoint::new("East Sector", 280, 120, 42),
            EntryPoint::new("South Sector", 180, 180, 18),
            EntryPoint::new("West Sector", 70, 150, 31),
            EntryPoint::new("Northeast Sector", 320, 70, 15),
        ]
    }
}

/// One sample of the registrations chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub label: String,
    pub profiles: u32,
}

impl ChartPoint {
    /// Initial chart series.
    pub fn defaults() -> Vec<ChartPoint> {
        [
            ("Jan 1", 12),
            ("Jan 5", 18),
            ("Jan 10", 24),
            ("Jan 15", 30),
            ("Jan 20", 22),
            ("Jan 25", 28),
            ("Jan 30", 36),
            ("Feb 5", 42),
            ("Feb 10", 48),
            ("Feb 15", 54),
            ("Feb 20", 60),
            ("Feb 25", 66),
            ("Mar 1", 72),
        ]
        .into_iter()
        .map(|(label, profiles)| ChartPoint {
            label: label.to_string(),
            profiles,
        })
        .collect()
    }
}

//! Command-center dashboard state.
//!
//! # Responsibility
//! - Own the session notification store and toast surface.
//! - Apply simulated feed events to stats, map, chart, activity and recent
//!   profiles, one at a time.
//! - Provide the manual refresh/export actions of the dashboard page.
//!
//! # Invariants
//! - `new_entries >= 38`, `active_cases >= 80`, `30 <= system_load <= 95`.
//! - Entry-point counts never drop below 5; chart samples never below 10.
//! - Active users never drop below 30.
//! - Activity and recent lists are most-recent-first and capacity-bounded.

use crate::config::DashboardConfig;
use crate::model::activity::{ActivityEvent, ActivityKind};
use crate::model::notification::{Notification, NotificationKind};
use crate::model::profile::{derive_alias, Gender, Profile, ProfileStatus};
use crate::model::stats::{ChartPoint, DashboardStats, EntryPoint};
use crate::notify::store::{NotificationEvent, NotificationStore, SidebarDigest};
use crate::notify::toast::{Toast, ToastSurface, ToastVariant};
use crate::service::profile_service::iso_date_from_epoch_ms;
use crate::sim::{ChartTick, EntryPointTick, SimEvent, StatsTick, TimedEvent};
use crate::time::format_time_ago;
use log::{info, trace};
use rand::Rng;
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::mpsc::Receiver;

const MIN_NEW_ENTRIES: u32 = 38;
const MIN_ACTIVE_CASES: u32 = 80;
const MIN_SYSTEM_LOAD: u32 = 30;
const MAX_SYSTEM_LOAD: u32 = 95;
const MIN_ENTRY_POINT_COUNT: u32 = 5;
const MIN_CHART_PROFILES: u32 = 10;
const MIN_ACTIVE_USERS: u32 = 30;
const NEW_ENTRY_POINT_PROBABILITY: f64 = 0.2;

/// Serializable view of the whole dashboard at one instant.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub stats: DashboardStats,
    pub unread_count: usize,
    pub notifications: Vec<Notification>,
    pub toast: Option<Toast>,
    pub activity: Vec<ActivityEvent>,
    pub entry_points: Vec<EntryPoint>,
    pub chart: Vec<ChartPoint>,
    pub recent: Vec<RecentProfileRow>,
    pub last_updated_ms: i64,
}

/// Row of the recent-profiles card.
#[derive(Debug, Clone, Serialize)]
pub struct RecentProfileRow {
    pub name: String,
    pub alias: String,
    pub entry_point: String,
    pub status: &'static str,
    pub updated: String,
}

pub struct Dashboard {
    config: DashboardConfig,
    notifications: NotificationStore,
    toast_events: Receiver<NotificationEvent>,
    toasts: ToastSurface,
    stats: DashboardStats,
    activity: VecDeque<ActivityEvent>,
    last_activity_id: u64,
    entry_points: Vec<EntryPoint>,
    chart: Vec<ChartPoint>,
    recent: VecDeque<Profile>,
    last_updated_ms: i64,
}

impl Dashboard {
    /// Builds the initial session state.
    ///
    /// `recent` is truncated to the configured capacity.
    pub fn new(config: DashboardConfig, recent: Vec<Profile>, now_ms: i64) -> Self {
        let mut notifications = NotificationStore::new();
        let toast_events = notifications.subscribe();
        let toasts = ToastSurface::new(config.toast_ttl);
        let mut recent: VecDeque<Profile> = recent.into();
        recent.truncate(config.recent_capacity);

        let mut dashboard = Self {
            config,
            notifications,
            toast_events,
            toasts,
            stats: DashboardStats::default(),
            activity: VecDeque::new(),
            last_activity_id: 0,
            entry_points: EntryPoint::defaults(),
            chart: ChartPoint::defaults(),
            recent,
            last_updated_ms: now_ms,
        };
        dashboard.record_activity(
            ActivityKind::Profile,
            "Profile #1248 updated",
            now_ms - 300_000,
        );
        dashboard.record_activity(ActivityKind::Login, "User admin logged in", now_ms - 120_000);
        dashboard
    }

    pub fn notifications(&self) -> &NotificationStore {
        &self.notifications
    }

    /// Mutable store handle for producers outside the dashboard.
    pub fn notifications_mut(&mut self) -> &mut NotificationStore {
        &mut self.notifications
    }

    pub fn sidebar(&self, limit: usize) -> SidebarDigest {
        self.notifications.digest(limit)
    }

    pub fn stats(&self) -> &DashboardStats {
        &self.stats
    }

    pub fn activity(&self) -> impl ExactSizeIterator<Item = &ActivityEvent> + '_ {
        self.activity.iter()
    }

    pub fn entry_points(&self) -> &[EntryPoint] {
        &self.entry_points
    }

    pub fn chart(&self) -> &[ChartPoint] {
        &self.chart
    }

    pub fn recent(&self) -> impl ExactSizeIterator<Item = &Profile> + '_ {
        self.recent.iter()
    }

    pub fn last_updated_ms(&self) -> i64 {
        self.last_updated_ms
    }

    /// Moves pending store events into the toast surface.
    pub fn pump_toasts(&mut self, now_ms: i64) -> usize {
        self.toasts.drain(&self.toast_events, now_ms)
    }

    pub fn current_toast(&self, now_ms: i64) -> Option<&Toast> {
        self.toasts.current(now_ms)
    }

    pub fn dismiss_toast(&mut self) {
        self.toasts.dismiss();
    }

    pub fn apply_all(&mut self, events: impl IntoIterator<Item = TimedEvent>) {
        for event in events {
            self.apply(&event);
        }
    }

    /// Applies one feed event.
    pub fn apply(&mut self, timed: &TimedEvent) {
        trace!(
            "event=sim_apply module=dashboard feed={} at_ms={}",
            timed.feed,
            timed.at_ms
        );
        let at_ms = timed.at_ms;
        match &timed.event {
            SimEvent::Notification {
                kind,
                title,
                message,
            } => {
                self.notifications.add_at(*kind, *title, *message, at_ms);
            }
            SimEvent::Stats(tick) => self.apply_stats(tick),
            SimEvent::Activity { kind, message } => self.record_activity(*kind, message, at_ms),
            SimEvent::EntryPoints(ticks) => self.apply_entry_points(ticks),
            SimEvent::Chart(ticks) => self.apply_chart(ticks),
            SimEvent::RecentProfileArrived => self.receive_recent_profile(at_ms),
            SimEvent::RecentProfileUpdated { slot, status } => {
                if !self.recent.is_empty() {
                    let index = slot % self.recent.len();
                    let profile = &mut self.recent[index];
                    profile.status = *status;
                    profile.last_updated_ms = at_ms;
                }
            }
            SimEvent::ActiveUsers { delta } => {
                self.stats.active_users =
                    offset_with_floor(self.stats.active_users, *delta, MIN_ACTIVE_USERS);
            }
        }
    }

    /// Manual refresh: bumps the counters and notifies.
    pub fn refresh(&mut self, rng: &mut impl Rng, now_ms: i64) {
        let stats = &mut self.stats;
        stats.total_profiles = stats.total_profiles.saturating_add(rng.gen_range(1..=5));
        stats.new_entries =
            offset_with_floor(stats.new_entries, rng.gen_range(-2..=2), MIN_NEW_ENTRIES);
        stats.active_cases =
            offset_with_floor(stats.active_cases, rng.gen_range(-2..=2), MIN_ACTIVE_CASES);
        if rng.gen_bool(NEW_ENTRY_POINT_PROBABILITY) {
            stats.entry_points += 1;
        }
        stats.system_load = offset_with_floor(stats.system_load, rng.gen_range(-5..5), MIN_SYSTEM_LOAD)
            .min(MAX_SYSTEM_LOAD);
        self.last_updated_ms = now_ms;

        info!("event=dashboard_refresh module=dashboard status=ok");
        self.notifications.add_at(
            NotificationKind::Info,
            "Dashboard Updated",
            "Latest profile data has been loaded.",
            now_ms,
        );
    }

    pub fn export(&mut self, now_ms: i64) {
        info!("event=dashboard_export module=dashboard status=ok");
        self.notifications.add_at(
            NotificationKind::Success,
            "Export Complete",
            "Dashboard data has been exported to your downloads folder.",
            now_ms,
        );
    }

    pub fn snapshot(&self, now_ms: i64) -> DashboardSnapshot {
        DashboardSnapshot {
            stats: self.stats.clone(),
            unread_count: self.notifications.unread_count(),
            notifications: self.notifications.snapshot(),
            toast: self.toasts.current(now_ms).cloned(),
            activity: self.activity.iter().cloned().collect(),
            entry_points: self.entry_points.clone(),
            chart: self.chart.clone(),
            recent: self
                .recent
                .iter()
                .map(|profile| RecentProfileRow {
                    name: profile.name.clone(),
                    alias: profile.alias.clone(),
                    entry_point: profile.entry_point.clone(),
                    status: profile.status.label(),
                    updated: format_time_ago(now_ms, profile.last_updated_ms),
                })
                .collect(),
            last_updated_ms: self.last_updated_ms,
        }
    }

    fn apply_stats(&mut self, tick: &StatsTick) {
        let stats = &mut self.stats;
        stats.total_profiles = stats.total_profiles.saturating_add(tick.total_profiles_delta);
        stats.new_entries =
            offset_with_floor(stats.new_entries, tick.new_entries_delta, MIN_NEW_ENTRIES);
        stats.active_cases =
            offset_with_floor(stats.active_cases, tick.active_cases_delta, MIN_ACTIVE_CASES);
        stats.system_load =
            offset_with_floor(stats.system_load, tick.system_load_delta, MIN_SYSTEM_LOAD)
                .min(MAX_SYSTEM_LOAD);
        stats.data_processed = ((stats.data_processed + 0.1) * 10.0).round() / 10.0;
    }

    fn apply_entry_points(&mut self, ticks: &[EntryPointTick]) {
        for (point, tick) in self.entry_points.iter_mut().zip(ticks) {
            point.count = offset_with_floor(point.count, tick.count_delta, MIN_ENTRY_POINT_COUNT);
            point.active = tick.active;
        }
    }

    fn apply_chart(&mut self, ticks: &[ChartTick]) {
        for tick in ticks {
            if let Some(point) = self.chart.get_mut(tick.index) {
                point.profiles = offset_with_floor(point.profiles, tick.delta, MIN_CHART_PROFILES);
            }
        }
    }

    fn record_activity(&mut self, kind: ActivityKind, message: &str, at_ms: i64) {
        self.last_activity_id += 1;
        self.activity.push_front(ActivityEvent {
            id: self.last_activity_id,
            kind,
            message: message.to_string(),
            at_ms,
        });
        self.activity.truncate(self.config.activity_capacity);
    }

    fn receive_recent_profile(&mut self, at_ms: i64) {
        let mut profile = Profile::new("Alex Rodriguez", Gender::Male, 27);
        profile.alias = derive_alias(&profile.name);
        profile.entry_point = "Northeast Sector".to_string();
        profile.entry_date = iso_date_from_epoch_ms(at_ms);
        profile.status = ProfileStatus::Active;
        profile.last_updated_ms = at_ms;

        self.toasts.flash(
            "New Profile Added",
            format!("{} has been added to the system.", profile.name),
            ToastVariant::Default,
            at_ms,
        );
        self.recent.push_front(profile);
        self.recent.truncate(self.config.recent_capacity);
    }
}

/// `value + delta`, never below `floor`.
fn offset_with_floor(value: u32, delta: i32, floor: u32) -> u32 {
    let shifted = (i64::from(value) + i64::from(delta)).max(i64::from(floor));
    u32::try_from(shifted).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::offset_with_floor;

    #[test]
    fn offset_with_floor_clamps_low_values() {
        assert_eq!(offset_with_floor(40, -5, 38), 38);
        assert_eq!(offset_with_floor(40, 2, 38), 42);
        assert_eq!(offset_with_floor(0, -1, 0), 0);
    }
}

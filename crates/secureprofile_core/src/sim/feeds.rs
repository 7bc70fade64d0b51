//! Stock feeds reproducing the dashboard's mock timers.

use super::{Cadence, ChartTick, EntryPointTick, Feed, SimEvent, StatsTick};
use crate::config::DashboardConfig;
use crate::model::activity::ActivityKind;
use crate::model::notification::NotificationKind;
use crate::model::profile::ProfileStatus;
use crate::model::stats::{ChartPoint, EntryPoint};
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use std::time::Duration;

const ENTRY_POINT_ACTIVE_PROBABILITY: f64 = 0.9;
const CHART_CHANGES_PER_TICK: usize = 3;
const UNDER_INVESTIGATION_PROBABILITY: f64 = 0.2;

/// Builds every stock feed from `config`.
pub fn standard_feeds(config: &DashboardConfig) -> Vec<Box<dyn Feed>> {
    vec![
        Box::new(NotificationFeed::new(
            config.notification_interval,
            config.notification_probability,
        )),
        Box::new(StatsFeed::new(config.stats_interval)),
        Box::new(ActivityFeed::new(config.activity_interval)),
        Box::new(EntryPointFeed::new(
            config.entry_point_interval,
            EntryPoint::defaults().len(),
        )),
        Box::new(ChartFeed::new(
            config.chart_interval,
            ChartPoint::defaults().len(),
        )),
        Box::new(RecentArrivalFeed::new(config.recent_arrival_delay)),
        Box::new(RecentUpdateFeed::new(
            config.recent_update_interval,
            config.recent_capacity,
        )),
        Box::new(ActiveUsersFeed::new(config.active_users_interval)),
    ]
}

/// Canned title/message pair for a random notification.
pub fn canned_notification(kind: NotificationKind) -> (&'static str, &'static str) {
    match kind {
        NotificationKind::Info => ("System Update", "New system features have been deployed."),
        NotificationKind::Warning => ("Security Alert", "Unusual login activity detected."),
        NotificationKind::Success => (
            "Profile Updated",
            "Profile data has been successfully updated.",
        ),
        NotificationKind::Error => (
            "Connection Issue",
            "Unable to connect to the database server.",
        ),
    }
}

/// Occasionally raises a random canned notification.
#[derive(Debug, Clone)]
pub struct NotificationFeed {
    interval: Duration,
    probability: f64,
}

impl NotificationFeed {
    pub fn new(interval: Duration, probability: f64) -> Self {
        Self {
            interval,
            probability: probability.clamp(0.0, 1.0),
        }
    }
}

impl Feed for NotificationFeed {
    fn name(&self) -> &'static str {
        "notifications"
    }

    fn cadence(&self) -> Cadence {
        Cadence::Every(self.interval)
    }

    fn tick(&mut self, rng: &mut dyn RngCore) -> Vec<SimEvent> {
        if !rng.gen_bool(self.probability) {
            return Vec::new();
        }
        let kind = *NotificationKind::ALL
            .choose(rng)
            .unwrap_or(&NotificationKind::Info);
        let (title, message) = canned_notification(kind);
        vec![SimEvent::Notification {
            kind,
            title,
            message,
        }]
    }
}

#[derive(Debug, Clone)]
pub struct StatsFeed {
    interval: Duration,
}

impl StatsFeed {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Feed for StatsFeed {
    fn name(&self) -> &'static str {
        "stats"
    }

    fn cadence(&self) -> Cadence {
        Cadence::Every(self.interval)
    }

    fn tick(&mut self, rng: &mut dyn RngCore) -> Vec<SimEvent> {
        vec![SimEvent::Stats(StatsTick {
            total_profiles_delta: rng.gen_range(0..3),
            new_entries_delta: rng.gen_range(-2..=2),
            active_cases_delta: rng.gen_range(-2..=2),
            system_load_delta: rng.gen_range(-5..5),
        })]
    }
}

#[derive(Debug, Clone)]
pub struct ActivityFeed {
    interval: Duration,
}

impl ActivityFeed {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Feed for ActivityFeed {
    fn name(&self) -> &'static str {
        "activity"
    }

    fn cadence(&self) -> Cadence {
        Cadence::Every(self.interval)
    }

    fn tick(&mut self, rng: &mut dyn RngCore) -> Vec<SimEvent> {
        let kind = *ActivityKind::ALL
            .choose(rng)
            .unwrap_or(&ActivityKind::System);
        let message = kind
            .sample_messages()
            .choose(rng)
            .copied()
            .unwrap_or("System event");
        vec![SimEvent::Activity { kind, message }]
    }
}

#[derive(Debug, Clone)]
pub struct EntryPointFeed {
    interval: Duration,
    markers: usize,
}

impl EntryPointFeed {
    pub fn new(interval: Duration, markers: usize) -> Self {
        Self { interval, markers }
    }
}

impl Feed for EntryPointFeed {
    fn name(&self) -> &'static str {
        "entry_points"
    }

    fn cadence(&self) -> Cadence {
        Cadence::Every(self.interval)
    }

    fn tick(&mut self, rng: &mut dyn RngCore) -> Vec<SimEvent> {
        let ticks = (0..self.markers)
            .map(|_| EntryPointTick {
                count_delta: rng.gen_range(-2..=2),
                active: rng.gen_bool(ENTRY_POINT_ACTIVE_PROBABILITY),
            })
            .collect();
        vec![SimEvent::EntryPoints(ticks)]
    }
}

#[derive(Debug, Clone)]
pub struct ChartFeed {
    interval: Duration,
    points: usize,
}

impl ChartFeed {
    pub fn new(interval: Duration, points: usize) -> Self {
        Self { interval, points }
    }
}

impl Feed for ChartFeed {
    fn name(&self) -> &'static str {
        "chart"
    }

    fn cadence(&self) -> Cadence {
        Cadence::Every(self.interval)
    }

    fn tick(&mut self, rng: &mut dyn RngCore) -> Vec<SimEvent> {
        if self.points == 0 {
            return Vec::new();
        }
        let ticks = (0..CHART_CHANGES_PER_TICK)
            .map(|_| {
                let change = rng.gen_range(1..=5);
                ChartTick {
                    index: rng.gen_range(0..self.points),
                    delta: if rng.gen_bool(0.5) { change } else { -change },
                }
            })
            .collect();
        vec![SimEvent::Chart(ticks)]
    }
}

/// One-shot arrival of a new profile in the recent list.
#[derive(Debug, Clone)]
pub struct RecentArrivalFeed {
    delay: Duration,
}

impl RecentArrivalFeed {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Feed for RecentArrivalFeed {
    fn name(&self) -> &'static str {
        "recent_arrival"
    }

    fn cadence(&self) -> Cadence {
        Cadence::Once(self.delay)
    }

    fn tick(&mut self, _rng: &mut dyn RngCore) -> Vec<SimEvent> {
        vec![SimEvent::RecentProfileArrived]
    }
}

#[derive(Debug, Clone)]
pub struct RecentUpdateFeed {
    interval: Duration,
    capacity: usize,
}

impl RecentUpdateFeed {
    pub fn new(interval: Duration, capacity: usize) -> Self {
        Self {
            interval,
            capacity: capacity.max(1),
        }
    }
}

impl Feed for RecentUpdateFeed {
    fn name(&self) -> &'static str {
        "recent_update"
    }

    fn cadence(&self) -> Cadence {
        Cadence::Every(self.interval)
    }

    fn tick(&mut self, rng: &mut dyn RngCore) -> Vec<SimEvent> {
        let status = if rng.gen_bool(UNDER_INVESTIGATION_PROBABILITY) {
            ProfileStatus::UnderInvestigation
        } else {
            ProfileStatus::Active
        };
        vec![SimEvent::RecentProfileUpdated {
            slot: rng.gen_range(0..self.capacity),
            status,
        }]
    }
}

#[derive(Debug, Clone)]
pub struct ActiveUsersFeed {
    interval: Duration,
}

impl ActiveUsersFeed {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Feed for ActiveUsersFeed {
    fn name(&self) -> &'static str {
        "active_users"
    }

    fn cadence(&self) -> Cadence {
        Cadence::Every(self.interval)
    }

    fn tick(&mut self, rng: &mut dyn RngCore) -> Vec<SimEvent> {
        vec![SimEvent::ActiveUsers {
            delta: rng.gen_range(-2..=2),
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::{ChartFeed, NotificationFeed, StatsFeed};
    use crate::sim::{Feed, SimEvent};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::time::Duration;

    #[test]
    fn notification_feed_respects_probability_extremes() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut never = NotificationFeed::new(Duration::from_secs(1), 0.0);
        let mut always = NotificationFeed::new(Duration::from_secs(1), 1.0);
        for _ in 0..20 {
            assert!(never.tick(&mut rng).is_empty());
            assert!(matches!(
                always.tick(&mut rng).as_slice(),
                [SimEvent::Notification { .. }]
            ));
        }
    }

    #[test]
    fn stats_ticks_stay_within_ranges() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut feed = StatsFeed::new(Duration::from_secs(1));
        for _ in 0..200 {
            let events = feed.tick(&mut rng);
            let [SimEvent::Stats(tick)] = events.as_slice() else {
                panic!("stats feed must emit exactly one stats tick");
            };
            assert!(tick.total_profiles_delta < 3);
            assert!((-2..=2).contains(&tick.new_entries_delta));
            assert!((-5..5).contains(&tick.system_load_delta));
        }
    }

    #[test]
    fn chart_ticks_target_existing_points() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut feed = ChartFeed::new(Duration::from_secs(1), 4);
        for event in (0..50).flat_map(|_| feed.tick(&mut rng)) {
            let SimEvent::Chart(ticks) = event else {
                panic!("chart feed must emit chart ticks");
            };
            assert_eq!(ticks.len(), 3);
            assert!(ticks
                .iter()
                .all(|tick| tick.index < 4 && tick.delta != 0 && tick.delta.abs() <= 5));
        }
    }
}

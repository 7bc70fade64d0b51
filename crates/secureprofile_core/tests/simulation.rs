use secureprofile_core::sim::{standard_feeds, EventSource, Scheduler, SimEvent};
use secureprofile_core::DashboardConfig;
use std::time::Duration;

const ORIGIN_MS: i64 = 1_700_000_000_000;

fn scheduler(config: &DashboardConfig, seed: u64) -> Scheduler {
    Scheduler::new(ORIGIN_MS, Some(seed)).with_feeds(standard_feeds(config))
}

#[test]
fn standard_feeds_cover_every_dashboard_timer() {
    let names = scheduler(&DashboardConfig::default(), 1).feed_names();
    assert_eq!(
        names,
        vec![
            "notifications",
            "stats",
            "activity",
            "entry_points",
            "chart",
            "recent_arrival",
            "recent_update",
            "active_users",
        ]
    );
}

#[test]
fn same_seed_yields_same_session() {
    let config = DashboardConfig::default();
    let mut first = scheduler(&config, 7);
    let mut second = scheduler(&config, 7);

    let horizon = Duration::from_secs(120);
    assert_eq!(first.poll(horizon), second.poll(horizon));
}

#[test]
fn late_poll_matches_incremental_polls() {
    let config = DashboardConfig::default();
    let mut stepwise = scheduler(&config, 11);
    let mut batched = scheduler(&config, 11);

    let mut collected = Vec::new();
    for second in 1..=60 {
        collected.extend(stepwise.poll(Duration::from_secs(second)));
    }
    assert_eq!(collected, batched.poll(Duration::from_secs(60)));
}

#[test]
fn events_are_stamped_in_deadline_order() {
    let mut scheduler = scheduler(&DashboardConfig::default(), 3);
    let events = scheduler.poll(Duration::from_secs(90));

    assert!(!events.is_empty());
    assert!(events.windows(2).all(|pair| pair[0].at_ms <= pair[1].at_ms));
    assert!(events.iter().all(|event| event.at_ms > ORIGIN_MS));
}

#[test]
fn recent_arrival_fires_exactly_once() {
    let mut scheduler = scheduler(&DashboardConfig::default(), 5);
    let events = scheduler.poll(Duration::from_secs(600));

    let arrivals: Vec<i64> = events
        .iter()
        .filter(|event| event.event == SimEvent::RecentProfileArrived)
        .map(|event| event.at_ms)
        .collect();
    assert_eq!(arrivals, vec![ORIGIN_MS + 10_000]);
}

#[test]
fn certain_notification_feed_fires_every_period() {
    let config = DashboardConfig {
        notification_probability: 1.0,
        ..DashboardConfig::default()
    };
    let mut scheduler = scheduler(&config, 9);
    let notifications = scheduler
        .poll(Duration::from_secs(135))
        .into_iter()
        .filter(|event| matches!(event.event, SimEvent::Notification { .. }))
        .count();
    assert_eq!(notifications, 3);
}

#[test]
fn silent_notification_feed_never_fires() {
    let config = DashboardConfig {
        notification_probability: 0.0,
        ..DashboardConfig::default()
    };
    let mut scheduler = scheduler(&config, 9);
    assert!(scheduler
        .poll(Duration::from_secs(600))
        .iter()
        .all(|event| !matches!(event.event, SimEvent::Notification { .. })));
}

#[test]
fn event_source_delivers_and_stops() {
    let config = DashboardConfig {
        stats_interval: Duration::from_millis(20),
        ..DashboardConfig::default()
    };
    let source = EventSource::spawn(scheduler(&config, 13)).unwrap();

    let first = source
        .next_timeout(Duration::from_secs(5))
        .expect("stats feed should fire");
    assert_eq!(first.feed, "stats");
    assert!(matches!(first.event, SimEvent::Stats(_)));

    source.stop();
}

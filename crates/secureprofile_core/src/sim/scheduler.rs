//! Deterministic feed scheduler.
//!
//! The scheduler works on elapsed session time, so tests can drive it with
//! synthetic durations and a seeded RNG.

use super::{Cadence, Feed, SimEvent};
use log::trace;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Duration;

/// Event stamped with the feed that produced it and its due time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimedEvent {
    pub feed: &'static str,
    /// Session start plus the feed deadline, epoch milliseconds.
    pub at_ms: i64,
    pub event: SimEvent,
}

struct ScheduledFeed {
    feed: Box<dyn Feed>,
    next_due: Option<Duration>,
}

pub struct Scheduler {
    feeds: Vec<ScheduledFeed>,
    rng: StdRng,
    origin_ms: i64,
}

impl Scheduler {
    /// `seed = None` draws entropy from the OS.
    pub fn new(origin_ms: i64, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            feeds: Vec::new(),
            rng,
            origin_ms,
        }
    }

    pub fn with_feeds(mut self, feeds: impl IntoIterator<Item = Box<dyn Feed>>) -> Self {
        for feed in feeds {
            self.register(feed);
        }
        self
    }

    /// Adds a feed; its first deadline is one period after session start.
    pub fn register(&mut self, feed: Box<dyn Feed>) {
        let next_due = Some(feed.cadence().period());
        self.feeds.push(ScheduledFeed { feed, next_due });
    }

    pub fn feed_names(&self) -> Vec<&'static str> {
        self.feeds.iter().map(|entry| entry.feed.name()).collect()
    }

    /// Earliest pending deadline, or `None` when every feed has finished.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.feeds.iter().filter_map(|entry| entry.next_due).min()
    }

    /// Fires every deadline at or before `elapsed`, oldest first.
    ///
    /// Missed periods are replayed, so polling late yields the same events
    /// as polling on time.
    pub fn poll(&mut self, elapsed: Duration) -> Vec<TimedEvent> {
        let mut fired = Vec::new();
        while let Some(index) = self.next_due_index(elapsed) {
            let entry = &mut self.feeds[index];
            let Some(due) = entry.next_due else {
                break;
            };

            let name = entry.feed.name();
            let at_ms = self
                .origin_ms
                .saturating_add(i64::try_from(due.as_millis()).unwrap_or(i64::MAX));
            let events = entry.feed.tick(&mut self.rng);
            trace!(
                "event=feed_tick module=sim feed={name} due_ms={} events={}",
                due.as_millis(),
                events.len()
            );
            fired.extend(events.into_iter().map(|event| TimedEvent {
                feed: name,
                at_ms,
                event,
            }));

            entry.next_due = match entry.feed.cadence() {
                Cadence::Every(period) if !period.is_zero() => Some(due + period),
                Cadence::Every(_) | Cadence::Once(_) => None,
            };
        }
        fired
    }

    fn next_due_index(&self, elapsed: Duration) -> Option<usize> {
        self.feeds
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| entry.next_due.map(|due| (due, index)))
            .filter(|(due, _)| *due <= elapsed)
            .min()
            .map(|(_, index)| index)
    }
}

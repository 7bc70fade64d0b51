//! Simulated real-time feeds.
//!
//! # Responsibility
//! - Describe each mock timer as a `Feed` producing `SimEvent`s.
//! - Schedule feeds deterministically (`Scheduler`) and deliver their events
//!   over a channel from a worker thread (`EventSource`).
//!
//! # Invariants
//! - Feeds never touch dashboard state; they only describe changes.
//! - Events are delivered in deadline order, ties in registration order.
//! - Stopping the source cancels every timer.

pub mod feeds;
pub mod scheduler;
pub mod source;

use crate::model::activity::ActivityKind;
use crate::model::notification::NotificationKind;
use crate::model::profile::ProfileStatus;
use rand::RngCore;
use std::time::Duration;

pub use feeds::standard_feeds;
pub use scheduler::{Scheduler, TimedEvent};
pub use source::EventSource;

/// When a feed fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cadence {
    /// Repeatedly, first after one interval.
    Every(Duration),
    /// Exactly once after the delay.
    Once(Duration),
}

impl Cadence {
    pub fn period(self) -> Duration {
        match self {
            Self::Every(period) | Self::Once(period) => period,
        }
    }
}

/// Random adjustment of the headline counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsTick {
    pub total_profiles_delta: u32,
    pub new_entries_delta: i32,
    pub active_cases_delta: i32,
    pub system_load_delta: i32,
}

/// Random adjustment for one map marker, by marker index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryPointTick {
    pub count_delta: i32,
    pub active: bool,
}

/// Random adjustment of one chart sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartTick {
    pub index: usize,
    pub delta: i32,
}

/// One change described by a feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimEvent {
    Notification {
        kind: NotificationKind,
        title: &'static str,
        message: &'static str,
    },
    Stats(StatsTick),
    Activity {
        kind: ActivityKind,
        message: &'static str,
    },
    EntryPoints(Vec<EntryPointTick>),
    Chart(Vec<ChartTick>),
    RecentProfileArrived,
    /// `slot` is reduced modulo the current recent-list length.
    RecentProfileUpdated {
        slot: usize,
        status: ProfileStatus,
    },
    ActiveUsers {
        delta: i32,
    },
}

/// One simulated timer.
pub trait Feed: Send {
    fn name(&self) -> &'static str;
    fn cadence(&self) -> Cadence;
    fn tick(&mut self, rng: &mut dyn RngCore) -> Vec<SimEvent>;
}

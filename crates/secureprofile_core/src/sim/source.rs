//! Channel-backed event source running the scheduler on a worker thread.

use super::scheduler::{Scheduler, TimedEvent};
use log::{debug, info};
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

const WORKER_THREAD_NAME: &str = "secureprofile-sim";

/// Running simulation. Dropping it stops the worker.
pub struct EventSource {
    events: Receiver<TimedEvent>,
    stop: Option<Sender<()>>,
    worker: Option<JoinHandle<()>>,
}

impl EventSource {
    /// Moves `scheduler` onto a worker thread and starts its clock.
    ///
    /// # Errors
    /// - Returns the OS error when the worker thread cannot be spawned.
    pub fn spawn(scheduler: Scheduler) -> std::io::Result<Self> {
        let (event_tx, event_rx) = channel();
        let (stop_tx, stop_rx) = channel();
        let feeds = scheduler.feed_names().join(",");

        let worker = thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || run_worker(scheduler, event_tx, stop_rx))?;

        info!("event=sim_start module=sim status=ok feeds={feeds}");
        Ok(Self {
            events: event_rx,
            stop: Some(stop_tx),
            worker: Some(worker),
        })
    }

    /// Next event if one is already queued.
    pub fn try_next(&self) -> Option<TimedEvent> {
        self.events.try_recv().ok()
    }

    /// Waits up to `timeout` for the next event.
    pub fn next_timeout(&self, timeout: Duration) -> Option<TimedEvent> {
        self.recv_timeout(timeout).ok()
    }

    /// Like `next_timeout`, but tells a quiet period (`Timeout`) apart from
    /// a worker that has exited (`Disconnected`).
    pub fn recv_timeout(&self, timeout: Duration) -> Result<TimedEvent, RecvTimeoutError> {
        self.events.recv_timeout(timeout)
    }

    /// Every event queued right now.
    pub fn drain(&self) -> Vec<TimedEvent> {
        self.events.try_iter().collect()
    }

    /// Cancels all timers and waits for the worker to exit.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(stop) = self.stop.take() {
            // The worker may already be gone; either way it stops.
            let _ = stop.send(());
        }
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
            info!("event=sim_stop module=sim status=ok");
        }
    }
}

impl Drop for EventSource {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run_worker(mut scheduler: Scheduler, events: Sender<TimedEvent>, stop: Receiver<()>) {
    let started_at = Instant::now();
    loop {
        let signal = match scheduler.next_deadline() {
            Some(deadline) => stop.recv_timeout(deadline.saturating_sub(started_at.elapsed())),
            None => stop.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };
        match signal {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => return,
            Err(RecvTimeoutError::Timeout) => {}
        }

        for event in scheduler.poll(started_at.elapsed()) {
            if events.send(event).is_err() {
                debug!("event=sim_worker_exit module=sim reason=receiver_dropped");
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::EventSource;
    use crate::sim::{Cadence, Feed, Scheduler, SimEvent};
    use rand::RngCore;
    use std::sync::mpsc::RecvTimeoutError;
    use std::time::Duration;

    struct Heartbeat;

    impl Feed for Heartbeat {
        fn name(&self) -> &'static str {
            "heartbeat"
        }

        fn cadence(&self) -> Cadence {
            Cadence::Every(Duration::from_millis(10))
        }

        fn tick(&mut self, _rng: &mut dyn RngCore) -> Vec<SimEvent> {
            vec![SimEvent::ActiveUsers { delta: 1 }]
        }
    }

    #[test]
    fn delivers_events_until_stopped() {
        let scheduler = Scheduler::new(0, Some(5)).with_feeds([Box::new(Heartbeat) as Box<dyn Feed>]);
        let source = EventSource::spawn(scheduler).expect("worker should spawn");

        let first = source
            .next_timeout(Duration::from_secs(5))
            .expect("heartbeat should arrive");
        assert_eq!(first.feed, "heartbeat");
        assert_eq!(first.at_ms, 10);

        source.stop();
    }

    struct Faulty;

    impl Feed for Faulty {
        fn name(&self) -> &'static str {
            "faulty"
        }

        fn cadence(&self) -> Cadence {
            Cadence::Once(Duration::from_millis(5))
        }

        fn tick(&mut self, _rng: &mut dyn RngCore) -> Vec<SimEvent> {
            panic!("feed failure");
        }
    }

    #[test]
    fn worker_exit_reports_disconnected() {
        let scheduler = Scheduler::new(0, Some(5)).with_feeds([Box::new(Faulty) as Box<dyn Feed>]);
        let source = EventSource::spawn(scheduler).expect("worker should spawn");

        assert!(matches!(
            source.recv_timeout(Duration::from_secs(5)),
            Err(RecvTimeoutError::Disconnected)
        ));
        source.stop();
    }

    #[test]
    fn drop_without_events_does_not_hang() {
        let scheduler = Scheduler::new(0, Some(5));
        let source = EventSource::spawn(scheduler).expect("worker should spawn");
        assert!(source.try_next().is_none());
        drop(source);
    }
}

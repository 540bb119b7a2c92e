//! Fixed-period poll timer.
//!
//! The timer runs as its own task and delivers ticks over a channel, so the
//! UI loop can `select!` on it next to keyboard input and API completions.
//! The task ends when the [`Poller`] is stopped or dropped.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

/// Default interval between game-state polls.
pub const POLL_PERIOD: Duration = Duration::from_secs(1);

pub struct Poller {
    ticks: mpsc::UnboundedReceiver<()>,
    handle: JoinHandle<()>,
}

impl Poller {
    /// Start ticking every `period`. The first tick arrives one full period
    /// after start.
    pub fn start(period: Duration) -> Self {
        let (tx, ticks) = mpsc::unbounded_channel();
        let handle = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                if tx.send(()).is_err() {
                    break;
                }
            }
        });
        Self { ticks, handle }
    }

    /// Wait for the next tick. Returns `None` once the poller has stopped.
    pub async fn tick(&mut self) -> Option<()> {
        self.ticks.recv().await
    }

    /// Cancel the timer task. Pending ticks already queued are discarded.
    pub fn stop(&mut self) {
        self.handle.abort();
        self.ticks.close();
        while self.ticks.try_recv().is_ok() {}
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

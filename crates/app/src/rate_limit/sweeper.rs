//! Periodic removal of expired limiter entries.

use std::{
    sync::{Arc, Weak},
    time::Duration,
};

use tokio::{
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};
use tracing::debug;

use crate::rate_limit::registry::RateLimiters;

const MIN_SWEEP_INTERVAL: Duration = Duration::from_millis(10);

/// Owns the background sweep task. Dropping the handle aborts the task.
#[derive(Debug)]
pub struct SweeperHandle {
    task: JoinHandle<()>,
}

impl SweeperHandle {
    /// Stop sweeping.
    pub fn stop(self) {
        drop(self);
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for SweeperHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

pub(super) fn spawn(limiters: Weak<RateLimiters>, every: Duration) -> SweeperHandle {
    let every = every.max(MIN_SWEEP_INTERVAL);

    let task = tokio::spawn(async move {
        let mut ticker = time::interval(every);

        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        // The first tick completes immediately.
        ticker.tick().await;

        loop {
            ticker.tick().await;

            let Some(limiters) = limiters.upgrade() else {
                break;
            };

            let removed = limiters.sweep();

            if removed > 0 {
                debug!(removed, "swept expired rate limit entries");
            }
        }
    });

    SweeperHandle { task }
}

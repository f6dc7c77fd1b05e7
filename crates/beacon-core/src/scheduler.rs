//! Periodic scheduler
//!
//! Both loops are a cycle function driven by a fixed-interval timer:
//!
//! ```text
//! ┌────────────┐     ┌──────────────────┐     ┌────────────┐
//! │ run_once() │ ──▶ │ sleep(interval)  │ ──▶ │ run_once() │ ──▶ ...
//! └────────────┘     └──────────────────┘     └────────────┘
//! ```
//!
//! The interval is measured from the end of a cycle, so a slow cycle delays
//! the next one by its own duration. There is no jitter, no back-off and no
//! catch-up of overdue cycles. The shutdown future cancels the loop at any
//! point, abandoning an in-flight cycle.

use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info};

/// One pass of a loop's state machine
#[async_trait]
pub trait Cycle: Send {
    /// Run a single cycle to completion
    ///
    /// Implementations absorb their own failures; a cycle never fails.
    async fn run_once(&mut self);

    /// Name of the loop (for logs)
    fn loop_name(&self) -> &'static str;
}

/// Fixed-interval driver for a [`Cycle`]
#[derive(Debug, Clone, Copy)]
pub struct PeriodicScheduler {
    interval: Duration,
}

impl PeriodicScheduler {
    /// Create a scheduler sleeping `interval` between cycles
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    /// The configured interval
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Drive `cycle` until `shutdown` resolves
    ///
    /// # Returns
    ///
    /// The number of cycles that ran to completion.
    pub async fn run<C, S>(&self, cycle: &mut C, shutdown: S) -> u64
    where
        C: Cycle + ?Sized,
        S: Future<Output = ()>,
    {
        let name = cycle.loop_name();
        let mut completed = 0u64;
        tokio::pin!(shutdown);

        info!("Starting {} loop (interval={:?})", name, self.interval);

        loop {
            tokio::select! {
                _ = cycle.run_once() => {
                    completed += 1;
                }
                _ = &mut shutdown => {
                    info!("Shutdown requested, abandoning in-flight {} cycle", name);
                    break;
                }
            }

            info!("--- Next {} check in {} seconds ---", name, self.interval.as_secs());

            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = &mut shutdown => {
                    debug!("Shutdown requested while {} loop was idle", name);
                    break;
                }
            }
        }

        info!("{} loop stopped after {} cycle(s)", name, completed);
        completed
    }
}

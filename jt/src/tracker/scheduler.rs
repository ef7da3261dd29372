//! Fixed-interval scheduler for tracker ticks
//!
//! Runs one [`PeriodicTask`] on a spawned tokio task. The first tick fires
//! immediately; ticks never overlap and a slow tick pushes the next one back
//! instead of bursting to catch up.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

/// Work performed on every tick
#[async_trait]
pub trait PeriodicTask: Send + 'static {
    async fn run_tick(&mut self, stop: &StopSignal);
}

/// Read side of a stop request
#[derive(Debug, Clone)]
pub struct StopSignal {
    rx: watch::Receiver<bool>,
}

impl StopSignal {
    /// Whether stop has been requested
    pub fn is_requested(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolve once stop is requested or the requesting side is gone
    pub async fn requested(&mut self) {
        let _ = self.rx.wait_for(|stop| *stop).await;
    }
}

/// Starts periodic tasks
pub struct Scheduler;

impl Scheduler {
    /// Spawn `task` to run every `period`, starting now
    pub fn start<T: PeriodicTask>(period: Duration, mut task: T) -> ScheduledHandle {
        debug!(period_ms = period.as_millis() as u64, "Scheduler::start: called");
        let (stop_tx, stop_rx) = watch::channel(false);
        let mut stop = StopSignal { rx: stop_rx };

        let join = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    _ = stop.requested() => {
                        debug!("Scheduler: stop requested between ticks");
                        break;
                    }
                    _ = interval.tick() => {}
                }

                if stop.is_requested() {
                    break;
                }
                task.run_tick(&stop).await;
            }

            debug!("Scheduler: loop exited");
        });

        ScheduledHandle { stop_tx, join }
    }
}

/// Handle to a running periodic task
pub struct ScheduledHandle {
    stop_tx: watch::Sender<bool>,
    join: JoinHandle<()>,
}

impl ScheduledHandle {
    /// Stop the loop and wait for it to exit
    ///
    /// Waits up to `grace` for an in-flight tick to finish, then aborts the
    /// task and waits for the abort to land. No tick starts after this
    /// returns.
    pub async fn stop(mut self, grace: Duration) {
        debug!(grace_ms = grace.as_millis() as u64, "ScheduledHandle::stop: called");
        self.stop_tx.send_replace(true);

        match tokio::time::timeout(grace, &mut self.join).await {
            Ok(Ok(())) => {
                debug!("ScheduledHandle::stop: loop exited cleanly");
            }
            Ok(Err(e)) => {
                if e.is_panic() {
                    error!(error = %e, "Scheduled task panicked");
                } else {
                    debug!(error = %e, "ScheduledHandle::stop: task already cancelled");
                }
            }
            Err(_) => {
                warn!(
                    grace_ms = grace.as_millis() as u64,
                    "In-flight tick exceeded stop grace period, aborting"
                );
                self.join.abort();
                let _ = (&mut self.join).await;
                info!("Scheduled task aborted");
            }
        }
    }
}

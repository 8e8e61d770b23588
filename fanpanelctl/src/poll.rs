//! Live refresh loop
//!
//! A background task that re-fetches status on a fixed pause and writes it
//! into an already-built [`StatusView`]. It never rebuilds the view and never
//! retries a failed tick; the next tick is the retry.

use anyhow::Result;
use async_trait::async_trait;
use fanpanel_core::{StatusSnapshot, StatusView};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::client::FanPanelClient;

/// Default pause between the end of one cycle and the start of the next
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// View shared between the refresh task and whoever displays it
pub type SharedView = Arc<Mutex<StatusView>>;

/// Anything that can answer `getStatus`
#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn fetch_status(&self) -> Result<StatusSnapshot>;
}

#[async_trait]
impl StatusSource for FanPanelClient {
    async fn fetch_status(&self) -> Result<StatusSnapshot> {
        self.get_status().await
    }
}

/// Counters published after every cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollStats {
    pub ticks: u64,
    pub successes: u64,
    pub failures: u64,
}

pub struct RefreshLoop<S> {
    source: Arc<S>,
    view: SharedView,
    interval: Duration,
}

impl<S> RefreshLoop<S>
where
    S: StatusSource + 'static,
{
    pub fn new(source: Arc<S>, view: SharedView, interval: Duration) -> Self {
        Self {
            source,
            view,
            interval,
        }
    }

    /// Spawn the loop. The first fetch happens one interval after start.
    pub fn start(self) -> PollHandle {
        let (cancel_tx, cancel_rx) = watch::channel(false);
        let (stats_tx, stats_rx) = watch::channel(PollStats::default());

        let task = tokio::spawn(self.run(cancel_rx, stats_tx));

        PollHandle {
            cancel_tx,
            stats: stats_rx,
            task: Some(task),
        }
    }

    async fn run(self, mut cancel: watch::Receiver<bool>, stats: watch::Sender<PollStats>) {
        info!(
            "Starting status refresh with {}s interval",
            self.interval.as_secs_f64()
        );

        loop {
            tokio::select! {
                biased;
                _ = cancel.changed() => break,
                _ = sleep(self.interval) => {}
            }

            let tick = stats.borrow().ticks + 1;
            debug!("Refresh tick {}", tick);

            let result = tokio::select! {
                biased;
                _ = cancel.changed() => break,
                result = self.source.fetch_status() => result,
            };

            let mut view = self.view.lock().await;
            if *cancel.borrow() {
                break;
            }

            let succeeded = match result {
                Ok(status) => {
                    let updated = view.apply(&status);
                    debug!("Tick {} updated {} gauges", tick, updated);
                    true
                }
                Err(e) => {
                    warn!("Status refresh failed: {:#}", e);
                    view.mark_stale();
                    false
                }
            };
            drop(view);

            stats.send_modify(|s| {
                s.ticks = tick;
                if succeeded {
                    s.successes += 1;
                } else {
                    s.failures += 1;
                }
            });
        }

        debug!("Status refresh stopped");
    }
}

/// Handle to a running refresh loop
pub struct PollHandle {
    cancel_tx: watch::Sender<bool>,
    stats: watch::Receiver<PollStats>,
    task: Option<JoinHandle<()>>,
}

impl PollHandle {
    /// Stop the loop and wait until it has exited. No write reaches the view
    /// after this returns.
    pub async fn cancel(mut self) {
        let _ = self.cancel_tx.send(true);
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!("Refresh task ended abnormally: {}", e);
            }
        }
    }

    pub fn stats(&self) -> PollStats {
        *self.stats.borrow()
    }

    /// Receiver notified after every completed cycle
    pub fn subscribe(&self) -> watch::Receiver<PollStats> {
        self.stats.clone()
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        let _ = self.cancel_tx.send(true);
    }
}

//! Block-height poller.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use crate::blockchain::client::ChainRpc;
use crate::blockchain::types::{ChainStatus, WalletError, WalletResult};
use crate::observability::metrics;
use crate::wallet::notify::{Notification, Notifier};

/// A running poll task.
struct PollTask {
    active: Arc<AtomicBool>,
    stop_tx: broadcast::Sender<()>,
    handle: JoinHandle<()>,
}

/// Keeps [`ChainStatus`] fresh by querying the block height on a fixed interval.
pub struct ChainPoller {
    rpc: Arc<dyn ChainRpc>,
    interval: Duration,
    status: Arc<watch::Sender<ChainStatus>>,
    notifier: Notifier,
    task: Option<PollTask>,
}

impl ChainPoller {
    pub fn new(rpc: Arc<dyn ChainRpc>, interval: Duration, notifier: Notifier) -> Self {
        let (status, _) = watch::channel(ChainStatus::default());
        Self {
            rpc,
            interval,
            status: Arc::new(status),
            notifier,
            task: None,
        }
    }

    /// Current chain status.
    pub fn status(&self) -> ChainStatus {
        *self.status.borrow()
    }

    /// Observe status changes.
    pub fn subscribe(&self) -> watch::Receiver<ChainStatus> {
        self.status.subscribe()
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.handle.is_finished())
    }

    /// Spawn the poll loop. The first query fires immediately.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(&mut self) -> WalletResult<()> {
        if self.is_running() {
            tracing::warn!("Chain poller start requested while already running");
            return Err(WalletError::PollerAlreadyRunning);
        }

        let active = Arc::new(AtomicBool::new(true));
        let (stop_tx, stop_rx) = broadcast::channel(1);
        let handle = tokio::spawn(poll_loop(
            self.rpc.clone(),
            self.interval,
            self.status.clone(),
            active.clone(),
            stop_rx,
            self.notifier.clone(),
        ));

        self.task = Some(PollTask {
            active,
            stop_tx,
            handle,
        });
        metrics::record_poller_running(true);
        tracing::info!(interval_secs = self.interval.as_secs(), "Chain poller started");
        Ok(())
    }

    /// Stop the poll loop. Safe to call any number of times.
    ///
    /// Once this returns, no tick or in-flight query touches the status.
    pub fn stop(&mut self) {
        let Some(task) = self.task.take() else {
            return;
        };

        // Deactivate under the status lock so a concurrently completing query
        // either lands before this or not at all.
        self.status.send_modify(|status| {
            task.active.store(false, Ordering::SeqCst);
            status.is_syncing = false;
        });
        let _ = task.stop_tx.send(());
        task.handle.abort();

        metrics::record_poller_running(false);
        tracing::info!("Chain poller stopped");
    }
}

impl Drop for ChainPoller {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for ChainPoller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainPoller")
            .field("interval", &self.interval)
            .field("status", &self.status())
            .field("running", &self.is_running())
            .finish()
    }
}

/// Apply `update` only while the poller is still active.
fn apply_if_active(
    status: &watch::Sender<ChainStatus>,
    active: &AtomicBool,
    update: impl FnOnce(&mut ChainStatus),
) -> bool {
    status.send_if_modified(|s| {
        if !active.load(Ordering::SeqCst) {
            return false;
        }
        update(s);
        true
    })
}

async fn poll_loop(
    rpc: Arc<dyn ChainRpc>,
    interval: Duration,
    status: Arc<watch::Sender<ChainStatus>>,
    active: Arc<AtomicBool>,
    mut stop_rx: broadcast::Receiver<()>,
    notifier: Notifier,
) {
    let mut ticker = time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = stop_rx.recv() => break,
        }

        if !apply_if_active(&status, &active, |s| s.is_syncing = true) {
            break;
        }

        let result = tokio::select! {
            result = rpc.block_number() => result,
            _ = stop_rx.recv() => break,
        };

        match result {
            Ok(height) => {
                let applied = apply_if_active(&status, &active, |s| {
                    s.latest_block_height = Some(height);
                    s.is_syncing = false;
                });
                if !applied {
                    tracing::debug!(height, "Discarding block height received after stop");
                    break;
                }
                metrics::record_block_height(height);
                tracing::debug!(height, "Block height updated");
                notifier.send(Notification::BlockHeight { height });
            }
            Err(e) => {
                if !apply_if_active(&status, &active, |s| s.is_syncing = false) {
                    break;
                }
                tracing::warn!(error = %e, "Block height query failed");
                notifier.failure(&e);
            }
        }
    }

    tracing::debug!("Chain poller loop exited");
}

//! Periodic directory refresh.
//!
//! # Responsibilities
//! - Rebuild the account directory on a fixed interval
//! - Swap the new snapshot in on success
//! - Keep serving the previous snapshot on failure
//!
//! Each tick is an independent attempt: no backoff, no jitter.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::accounts::directory::SharedDirectory;
use crate::accounts::source::{DirectoryError, DirectoryLoader};
use crate::observability::metrics;

/// How often the directory is rebuilt.
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(10);

impl SharedDirectory {
    /// Rebuild from `loader` and install the result. On error the current
    /// snapshot is left in place.
    pub async fn refresh(&self, loader: &DirectoryLoader) -> Result<u64, DirectoryError> {
        let next = loader.load().await?;
        Ok(self.replace(next))
    }
}

pub struct DirectoryRefresher {
    directory: Arc<SharedDirectory>,
    loader: DirectoryLoader,
    interval: Duration,
}

impl DirectoryRefresher {
    pub fn new(directory: Arc<SharedDirectory>, loader: DirectoryLoader, interval: Duration) -> Self {
        Self {
            directory,
            loader,
            interval,
        }
    }

    /// Run until `shutdown` fires. The first refresh happens one interval after start.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(every = ?self.interval, "Directory refresher starting");

        let mut ticker = time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.refresh_once().await;
                }
                _ = shutdown.recv() => {
                    tracing::info!("Directory refresher received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    async fn refresh_once(&self) {
        match self.directory.refresh(&self.loader).await {
            Ok(generation) => {
                metrics::record_directory_refresh("ok");
                tracing::debug!(generation, "Account directory refreshed");
            }
            Err(e) => {
                metrics::record_directory_refresh("error");
                tracing::warn!(error = %e, "Failed to refresh accounts, keeping current directory");
            }
        }
    }
}

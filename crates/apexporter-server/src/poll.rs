//! Fetch-then-publish loop.
//!
//! Each cycle fetches player stats, then the map rotation, and only then
//! publishes. A failure anywhere leaves the previous cycle's values in place.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use apexporter_core::error::Result;

use crate::obs::ApexMetrics;
use crate::upstream::StatsSource;

pub struct Poller {
    source: Arc<dyn StatsSource>,
    metrics: Arc<ApexMetrics>,
    interval: Duration,
    exit_on_error: bool,
}

impl Poller {
    pub fn new(
        source: Arc<dyn StatsSource>,
        metrics: Arc<ApexMetrics>,
        interval: Duration,
        exit_on_error: bool,
    ) -> Self {
        Self {
            source,
            metrics,
            interval,
            exit_on_error,
        }
    }

    /// One all-or-nothing cycle.
    pub async fn poll_once(&self) -> Result<()> {
        let player = self.source.player_stats().await?;
        let map = self.source.map_rotation().await?;
        self.metrics.publish(&map, &player);
        tracing::debug!(
            player = %player.identifier,
            current_map = %map.current_map,
            next_map = %map.next_map,
            "cycle published"
        );
        Ok(())
    }

    /// `poll_once` plus self-metrics and logging.
    pub async fn tick(&self) -> Result<()> {
        let started = Instant::now();
        let res = self.poll_once().await;
        let elapsed = started.elapsed();

        match &res {
            Ok(()) => self.metrics.observe_poll(elapsed, None),
            Err(e) => {
                self.metrics.observe_poll(elapsed, Some(e.code()));
                tracing::error!(error = %e, reason = e.code().as_str(), "poll cycle failed");
            }
        }
        res
    }

    /// Poll until `shutdown` flips to true. The first cycle runs immediately.
    ///
    /// Returns the first cycle error when `exit_on_error` is set.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) -> Result<()> {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(interval_secs = self.interval.as_secs(), "poll loop started");
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.tick().await {
                        if self.exit_on_error {
                            return Err(e);
                        }
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        tracing::info!("poll loop stopping");
                        return Ok(());
                    }
                }
            }
        }
    }
}

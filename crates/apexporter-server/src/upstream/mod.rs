//! Upstream stats API access.
//!
//! `StatsSource` is the seam between the poll loop and HTTP, so the loop can
//! be driven by recorded snapshots in tests.

pub mod client;

use async_trait::async_trait;

use apexporter_core::error::Result;
use apexporter_core::{MapSnapshot, PlayerSnapshot};

pub use client::MozambiqueClient;

#[async_trait]
pub trait StatsSource: Send + Sync {
    async fn map_rotation(&self) -> Result<MapSnapshot>;
    async fn player_stats(&self) -> Result<PlayerSnapshot>;
}

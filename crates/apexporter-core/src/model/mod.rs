//! Upstream data model.
//!
//! - `map`: map rotation snapshot (`/maprotation`)
//! - `player`: player stats snapshot (`/bridge`)
//! - `identity`: how a player is addressed upstream
//!
//! Snapshots are built all-or-nothing: any missing key fails the whole
//! extraction so callers never publish a half-updated cycle.

pub mod identity;
pub mod map;
pub mod path;
pub mod player;

pub use identity::{Platform, PlayerIdentity};
pub use map::MapSnapshot;
pub use player::{legend_kills, PlayerSnapshot};

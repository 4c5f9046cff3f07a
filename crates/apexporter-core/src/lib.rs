//! apexporter core: upstream data model, field extraction, and error types.
//!
//! This crate turns the JSON documents served by the Apex Legends stats API
//! into flat snapshots. It carries no HTTP or runtime dependencies so the
//! extraction rules can be tested against recorded responses.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! A malformed upstream response surfaces as `ExporterError`, never a crash.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod model;

/// Shared result type.
pub use error::{ErrorCode, ExporterError, Result};
pub use model::{legend_kills, MapSnapshot, Platform, PlayerIdentity, PlayerSnapshot};

//! In-process metrics for the exporter.
//!
//! Published player/map values and the exporter's own poll counters live in
//! one registry, rendered by the `/metrics` handler.

pub mod metrics;

pub use metrics::ApexMetrics;

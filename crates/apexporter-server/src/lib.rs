//! apexporter server library entry.
//!
//! Wires configuration, the upstream client, the poll loop, and the metrics
//! HTTP surface. Consumed by the binary (`main.rs`) and integration tests.

pub mod app_state;
pub mod config;
pub mod obs;
pub mod ops;
pub mod poll;
pub mod router;
pub mod upstream;

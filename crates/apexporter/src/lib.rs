//! Top-level facade crate for apexporter.
//!
//! Re-exports the data model and the server library so users can depend on a single crate.

pub mod core {
    pub use apexporter_core::*;
}

pub mod server {
    pub use apexporter_server::*;
}

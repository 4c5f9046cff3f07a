//! Shared application state for the exporter HTTP surface.

use std::sync::Arc;

use crate::obs::ApexMetrics;

#[derive(Clone)]
pub struct AppState {
    metrics: Arc<ApexMetrics>,
}

impl AppState {
    pub fn new(metrics: Arc<ApexMetrics>) -> Self {
        Self { metrics }
    }

    pub fn metrics(&self) -> Arc<ApexMetrics> {
        Arc::clone(&self.metrics)
    }

    pub fn is_draining(&self) -> bool {
        self.metrics.is_draining()
    }

    pub fn is_ready(&self) -> bool {
        !self.is_draining() && self.metrics.has_published()
    }
}

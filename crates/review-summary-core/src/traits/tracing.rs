use std::time::Duration;

use tracing::{debug, warn};

use crate::{FailureKind, ProductId, SummaryMetrics, SummaryOperation};

/// Metrics adapter that logs events via `tracing`
#[derive(Debug, Clone, Default)]
pub struct TracingMetrics {
    /// Service name/prefix (optional)
    service_name: Option<String>,
}

impl TracingMetrics {
    /// Create new tracing metrics adapter
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with service name prefix
    pub fn with_service_name(mut self, name: impl Into<String>) -> Self {
        self.service_name = Some(name.into());
        self
    }
}

impl SummaryMetrics for TracingMetrics {
    fn record_hit(&self, product: ProductId) {
        debug!(
            target: "review_summary",
            event = "hit",
            product = %product,
            service = ?self.service_name,
            "Summary Hit"
        );
    }

    fn record_miss(&self, product: ProductId) {
        debug!(
            target: "review_summary",
            event = "miss",
            product = %product,
            service = ?self.service_name,
            "Summary Miss"
        );
    }

    fn record_coalesced(&self, product: ProductId) {
        debug!(
            target: "review_summary",
            event = "coalesced",
            product = %product,
            service = ?self.service_name,
            "Summary Request Coalesced"
        );
    }

    fn record_latency(&self, operation: SummaryOperation, duration: Duration) {
        tracing::trace!(
            target: "review_summary",
            event = "latency",
            operation = operation.as_str(),
            duration_ms = duration.as_millis(),
            service = ?self.service_name,
            "Summary Operation Latency"
        );
    }

    fn record_failure(&self, product: ProductId, kind: FailureKind) {
        warn!(
            target: "review_summary",
            event = "failure",
            product = %product,
            kind = kind.as_str(),
            service = ?self.service_name,
            "Summary Computation Failed"
        );
    }
}

//! Metrics trait for summary service observability

use std::time::Duration;

use crate::ProductId;

/// Service operation for latency tracking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SummaryOperation {
    /// Persisted summary lookup
    ReadSummary,
    /// Recent review fetch
    FetchReviews,
    /// Generation backend call
    Generate,
    /// Summary write-back
    WriteSummary,
}

impl SummaryOperation {
    /// Get operation as string label
    pub fn as_str(&self) -> &'static str {
        match self {
            SummaryOperation::ReadSummary => "read_summary",
            SummaryOperation::FetchReviews => "fetch_reviews",
            SummaryOperation::Generate => "generate",
            SummaryOperation::WriteSummary => "write_summary",
        }
    }
}

/// Category of a failed computation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Generation backend errored or timed out
    Generation,
    /// Review store read or write failed
    Store,
    /// Computation ended without an outcome
    Internal,
}

impl FailureKind {
    /// Get kind as string label
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Generation => "generation",
            FailureKind::Store => "store",
            FailureKind::Internal => "internal",
        }
    }

    /// Classify an error
    pub fn of(err: &crate::SummaryError) -> Self {
        if err.is_generation_failure() {
            FailureKind::Generation
        } else if err.is_store_failure() {
            FailureKind::Store
        } else {
            FailureKind::Internal
        }
    }
}

/// Trait for summary metrics/observability
///
/// Implement this to integrate with your metrics system (Prometheus, StatsD, etc.)
pub trait SummaryMetrics: Send + Sync + 'static {
    /// Record a request answered from the persisted summary
    fn record_hit(&self, product: ProductId);

    /// Record a request that found no persisted summary
    fn record_miss(&self, product: ProductId);

    /// Record a request that joined an in-flight computation
    fn record_coalesced(&self, product: ProductId);

    /// Record operation latency
    fn record_latency(&self, operation: SummaryOperation, duration: Duration);

    /// Record a failed computation
    fn record_failure(&self, product: ProductId, kind: FailureKind);
}

/// No-op metrics implementation (default)
///
/// Zero overhead when metrics are not needed.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMetrics;

impl SummaryMetrics for NoopMetrics {
    #[inline]
    fn record_hit(&self, _product: ProductId) {}

    #[inline]
    fn record_miss(&self, _product: ProductId) {}

    #[inline]
    fn record_coalesced(&self, _product: ProductId) {}

    #[inline]
    fn record_latency(&self, _operation: SummaryOperation, _duration: Duration) {}

    #[inline]
    fn record_failure(&self, _product: ProductId, _kind: FailureKind) {}
}

/// Metrics adapter using the `metrics` crate
///
/// Integrates with Prometheus, StatsD, and other exporters via the `metrics` ecosystem.
///
/// # Example
/// ```ignore
/// use review_summary_core::MetricsCrateAdapter;
///
/// // Set up a metrics recorder (e.g., prometheus_exporter)
/// // metrics::set_global_recorder(recorder);
///
/// let metrics = MetricsCrateAdapter::new("review_summary");
/// // Emits: review_summary_hits_total, review_summary_generations_total, etc.
/// ```
#[cfg(feature = "metrics")]
#[derive(Debug, Clone)]
pub struct MetricsCrateAdapter {
    prefix: String,
}

#[cfg(feature = "metrics")]
impl MetricsCrateAdapter {
    /// Create a new adapter with the given metric name prefix
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    fn metric_name(&self, name: &str) -> String {
        format!("{}_{}", self.prefix, name)
    }
}

#[cfg(feature = "metrics")]
impl SummaryMetrics for MetricsCrateAdapter {
    fn record_hit(&self, _product: ProductId) {
        metrics::counter!(self.metric_name("hits_total")).increment(1);
    }

    fn record_miss(&self, _product: ProductId) {
        metrics::counter!(self.metric_name("misses_total")).increment(1);
    }

    fn record_coalesced(&self, _product: ProductId) {
        metrics::counter!(self.metric_name("coalesced_total")).increment(1);
    }

    fn record_latency(&self, operation: SummaryOperation, duration: Duration) {
        metrics::histogram!(
            self.metric_name("operation_duration_seconds"),
            "operation" => operation.as_str()
        )
        .record(duration.as_secs_f64());
    }

    fn record_failure(&self, _product: ProductId, kind: FailureKind) {
        metrics::counter!(
            self.metric_name("failures_total"),
            "kind" => kind.as_str()
        )
        .increment(1);
    }
}

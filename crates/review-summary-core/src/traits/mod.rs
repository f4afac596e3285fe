//! Core traits for summary operations

mod generator;
mod metrics;
mod store;
#[cfg(feature = "tracing")]
mod tracing;

pub use generator::SummaryGenerator;
pub use metrics::{FailureKind, NoopMetrics, SummaryMetrics, SummaryOperation};
pub use store::ReviewStore;

#[cfg(feature = "metrics")]
pub use metrics::MetricsCrateAdapter;

#[cfg(feature = "tracing")]
pub use self::tracing::TracingMetrics;

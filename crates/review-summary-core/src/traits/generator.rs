//! Generation backend trait

use std::sync::Arc;

use async_trait::async_trait;

use crate::Result;

/// Text-generation backend that turns joined review text into a summary
///
/// Calls may be slow and may fail transiently. Implementations must not
/// retry internally; retry decisions belong to the caller.
#[async_trait]
pub trait SummaryGenerator: Send + Sync + 'static {
    /// Summarize the given review text
    async fn generate(&self, text: &str) -> Result<String>;
}

#[async_trait]
impl<T: SummaryGenerator + ?Sized> SummaryGenerator for Arc<T> {
    async fn generate(&self, text: &str) -> Result<String> {
        (**self).generate(text).await
    }
}

//! Review store trait

use std::sync::Arc;

use async_trait::async_trait;

use crate::{ProductId, Result, Review};

/// Storage holding raw reviews and the persisted summary per product
///
/// Implementations include the in-memory store and Redis.
#[async_trait]
pub trait ReviewStore: Send + Sync + 'static {
    /// Get the persisted summary for a product
    ///
    /// Returns `None` if no summary has been computed yet.
    async fn get_summary(&self, product: ProductId) -> Result<Option<String>>;

    /// Persist the summary for a product
    ///
    /// Only a computation leader writes, so last-write-wins is acceptable.
    async fn set_summary(&self, product: ProductId, summary: &str) -> Result<()>;

    /// Get up to `limit` reviews for a product, most recent first
    async fn get_recent_reviews(&self, product: ProductId, limit: usize) -> Result<Vec<Review>>;

    /// Get every review for a product, most recent first
    async fn get_reviews(&self, product: ProductId) -> Result<Vec<Review>> {
        self.get_recent_reviews(product, usize::MAX).await
    }
}

#[async_trait]
impl<T: ReviewStore + ?Sized> ReviewStore for Arc<T> {
    async fn get_summary(&self, product: ProductId) -> Result<Option<String>> {
        (**self).get_summary(product).await
    }

    async fn set_summary(&self, product: ProductId, summary: &str) -> Result<()> {
        (**self).set_summary(product, summary).await
    }

    async fn get_recent_reviews(&self, product: ProductId, limit: usize) -> Result<Vec<Review>> {
        (**self).get_recent_reviews(product, limit).await
    }

    async fn get_reviews(&self, product: ProductId) -> Result<Vec<Review>> {
        (**self).get_reviews(product).await
    }
}

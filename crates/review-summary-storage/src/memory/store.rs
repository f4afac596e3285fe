//! In-memory review store using DashMap

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::RwLock;
use std::sync::Arc;

use review_summary_core::{ProductId, Result, Review, ReviewStore, SummaryError};

/// Configuration for the memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStoreConfig {
    /// Maximum reviews retained per product, oldest dropped first (0 = unlimited)
    pub max_reviews_per_product: usize,
}

impl MemoryStoreConfig {
    /// Create config retaining at most `max` reviews per product
    pub fn with_review_cap(max: usize) -> Self {
        Self {
            max_reviews_per_product: max,
        }
    }
}

/// Operation counters for the memory store
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStoreStats {
    /// Summary lookups
    pub summary_reads: u64,
    /// Summary lookups that found a value
    pub summary_hits: u64,
    /// Summary writes
    pub summary_writes: u64,
    /// Review fetches
    pub review_reads: u64,
}

/// In-memory review store
///
/// Reviews are kept per product in most-recent-first order.
/// Cloning creates a new handle to the SAME underlying store.
#[derive(Clone, Default)]
pub struct MemoryReviewStore {
    /// Product -> reviews, most recent first
    reviews: Arc<DashMap<ProductId, Vec<Review>>>,
    /// Product -> persisted summary
    summaries: Arc<DashMap<ProductId, String>>,
    /// Statistics
    stats: Arc<RwLock<MemoryStoreStats>>,
    /// Configuration
    config: MemoryStoreConfig,
}

impl MemoryReviewStore {
    /// Create a new memory store
    pub fn new(config: MemoryStoreConfig) -> Self {
        Self {
            reviews: Arc::new(DashMap::new()),
            summaries: Arc::new(DashMap::new()),
            stats: Arc::new(RwLock::new(MemoryStoreStats::default())),
            config,
        }
    }

    /// Create with default configuration
    pub fn with_defaults() -> Self {
        Self::new(MemoryStoreConfig::default())
    }

    /// Store a review for a product
    ///
    /// Rejects invalid ratings and review ids already present for the product.
    pub fn add_review(&self, product: ProductId, review: Review) -> Result<()> {
        review.validate()?;

        let mut reviews = self.reviews.entry(product).or_default();
        if reviews.iter().any(|r| r.id == review.id) {
            return Err(SummaryError::InvalidReview(format!(
                "review {} already exists for product {}",
                review.id, product
            )));
        }

        let key = (review.created_at, review.id);
        let pos = reviews.partition_point(|r| (r.created_at, r.id) > key);
        reviews.insert(pos, review);

        if self.config.max_reviews_per_product > 0 {
            reviews.truncate(self.config.max_reviews_per_product);
        }
        Ok(())
    }

    /// Store several reviews for a product
    pub fn add_reviews(
        &self,
        product: ProductId,
        reviews: impl IntoIterator<Item = Review>,
    ) -> Result<()> {
        for review in reviews {
            self.add_review(product, review)?;
        }
        Ok(())
    }

    /// Number of reviews held for a product
    pub fn review_count(&self, product: ProductId) -> usize {
        self.reviews.get(&product).map(|r| r.len()).unwrap_or(0)
    }

    /// Number of products with a persisted summary
    pub fn summary_count(&self) -> usize {
        self.summaries.len()
    }

    /// Snapshot of the operation counters
    pub fn stats(&self) -> MemoryStoreStats {
        self.stats.read().clone()
    }
}

#[async_trait]
impl ReviewStore for MemoryReviewStore {
    async fn get_summary(&self, product: ProductId) -> Result<Option<String>> {
        let summary = self.summaries.get(&product).map(|s| s.value().clone());

        let mut stats = self.stats.write();
        stats.summary_reads += 1;
        if summary.is_some() {
            stats.summary_hits += 1;
        }
        Ok(summary)
    }

    async fn set_summary(&self, product: ProductId, summary: &str) -> Result<()> {
        self.summaries.insert(product, summary.to_string());
        self.stats.write().summary_writes += 1;
        tracing::debug!(target: "review_summary", product = %product, "summary stored");
        Ok(())
    }

    async fn get_recent_reviews(&self, product: ProductId, limit: usize) -> Result<Vec<Review>> {
        self.stats.write().review_reads += 1;
        Ok(self
            .reviews
            .get(&product)
            .map(|reviews| reviews.iter().take(limit).cloned().collect())
            .unwrap_or_default())
    }
}

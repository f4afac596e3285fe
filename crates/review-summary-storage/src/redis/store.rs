use async_trait::async_trait;
use bb8::{Pool, PooledConnection};
use bb8_redis::RedisConnectionManager;
use redis::AsyncCommands;

use review_summary_core::{ProductId, Result, Review, ReviewStore, SummaryError};

use super::config::RedisStoreConfig;

/// Redis review store
///
/// Layout per product:
/// - `{prefix}:summary:{id}` string holding the persisted summary
/// - `{prefix}:reviews:{id}` sorted set of JSON reviews scored by creation
///   time in milliseconds
#[derive(Clone)]
pub struct RedisReviewStore {
    pool: Pool<RedisConnectionManager>,
    config: RedisStoreConfig,
}

impl RedisReviewStore {
    /// Create a new Redis store
    pub async fn new(config: RedisStoreConfig) -> Result<Self> {
        let manager = RedisConnectionManager::new(config.url.as_str())
            .map_err(|e| SummaryError::Store(e.to_string()))?;

        let pool = Pool::builder()
            .max_size(config.pool_size)
            .connection_timeout(config.connection_timeout)
            .build(manager)
            .await
            .map_err(|e| SummaryError::Store(e.to_string()))?;

        Ok(Self { pool, config })
    }

    /// Store a review for a product
    pub async fn add_review(&self, product: ProductId, review: &Review) -> Result<()> {
        review.validate()?;
        let member = serde_json::to_string(review)
            .map_err(|e| SummaryError::Serialization(e.to_string()))?;

        let mut conn = self.get_connection().await?;
        let _: () = conn
            .zadd(
                self.reviews_key(product),
                member,
                review.created_at.timestamp_millis(),
            )
            .await
            .map_err(|e| SummaryError::Store(e.to_string()))?;
        Ok(())
    }

    fn key(&self, kind: &str, product: ProductId) -> String {
        match &self.config.key_prefix {
            Some(prefix) => format!("{}:{}:{}", prefix, kind, product),
            None => format!("{}:{}", kind, product),
        }
    }

    fn summary_key(&self, product: ProductId) -> String {
        self.key("summary", product)
    }

    fn reviews_key(&self, product: ProductId) -> String {
        self.key("reviews", product)
    }

    /// Get connection from pool
    async fn get_connection(&self) -> Result<PooledConnection<'_, RedisConnectionManager>> {
        self.pool
            .get()
            .await
            .map_err(|e| SummaryError::Store(e.to_string()))
    }
}

/// Inclusive stop index for a `ZREVRANGE` returning at most `limit` members
fn range_stop(limit: usize) -> isize {
    isize::try_from(limit).map(|l| l - 1).unwrap_or(-1)
}

#[async_trait]
impl ReviewStore for RedisReviewStore {
    async fn get_summary(&self, product: ProductId) -> Result<Option<String>> {
        let mut conn = self.get_connection().await?;
        conn.get(self.summary_key(product))
            .await
            .map_err(|e| SummaryError::Store(e.to_string()))
    }

    async fn set_summary(&self, product: ProductId, summary: &str) -> Result<()> {
        let mut conn = self.get_connection().await?;
        let _: () = conn
            .set(self.summary_key(product), summary)
            .await
            .map_err(|e| SummaryError::Store(e.to_string()))?;
        Ok(())
    }

    async fn get_recent_reviews(&self, product: ProductId, limit: usize) -> Result<Vec<Review>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let mut conn = self.get_connection().await?;
        let members: Vec<String> = conn
            .zrevrange(self.reviews_key(product), 0, range_stop(limit))
            .await
            .map_err(|e| SummaryError::Store(e.to_string()))?;

        members
            .iter()
            .map(|m| {
                serde_json::from_str::<Review>(m)
                    .map_err(|e| SummaryError::Serialization(e.to_string()))
            })
            .collect()
    }
}

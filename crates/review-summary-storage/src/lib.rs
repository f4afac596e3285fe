//! review-summary-storage: Review store implementations for review-summary

#[cfg(feature = "memory")]
pub mod memory;

#[cfg(feature = "redis")]
pub mod redis;

#[cfg(feature = "memory")]
pub use memory::{MemoryReviewStore, MemoryStoreConfig, MemoryStoreStats};

#[cfg(feature = "redis")]
pub use redis::{RedisReviewStore, RedisStoreConfig};

//! review-summary: Single-flight, persist-once product review summaries
//!
//! # Features
//!
//! - **Persist once**: a stored summary is never regenerated
//! - **Single-flight**: concurrent requests for one product share one generation call
//! - **Persist before release**: waiters only see summaries already in the store
//! - **No negative caching**: failures propagate and the next call retries
//! - **Pluggable stores** (Memory, Redis) and generation backends (OpenAI-compatible)
//! - **Metrics integration**
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use review_summary::prelude::*;
//!
//! struct Echo;
//!
//! #[async_trait]
//! impl SummaryGenerator for Echo {
//!     async fn generate(&self, text: &str) -> Result<String> {
//!         Ok(format!("{} characters of feedback", text.len()))
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//!     let store = MemoryReviewStore::with_defaults();
//!     let service = SummaryService::new(store, Echo);
//!
//!     match service.get_or_compute_summary(ProductId(42)).await? {
//!         SummaryResult::NoReviews => println!("Nothing to summarize yet"),
//!         result => println!("Summary: {:?}", result.summary()),
//!     }
//!
//!     Ok(())
//! }
//! ```

mod service;

// Re-export core
pub use review_summary_core::*;

// Re-export storage
#[cfg(feature = "memory")]
pub use review_summary_storage::{MemoryReviewStore, MemoryStoreConfig};

#[cfg(feature = "redis")]
pub use review_summary_storage::{RedisReviewStore, RedisStoreConfig};

#[cfg(feature = "openai")]
pub use review_summary_llm::{OpenAiConfig, OpenAiGenerator};

pub use async_trait::async_trait;

// Export service
pub use service::{SummaryService, SummaryServiceConfig};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        async_trait, ProductId, Result, Review, ReviewStore, SummaryError, SummaryGenerator,
        SummaryResult, SummaryService, SummaryServiceConfig,
    };

    #[cfg(feature = "memory")]
    pub use crate::{MemoryReviewStore, MemoryStoreConfig};

    #[cfg(feature = "openai")]
    pub use crate::{OpenAiConfig, OpenAiGenerator};
}

#[cfg(test)]
mod tests;

//! In-memory review store

mod store;

pub use store::{MemoryReviewStore, MemoryStoreConfig, MemoryStoreStats};

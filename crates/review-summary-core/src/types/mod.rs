//! Core types for summary operations

mod product;
mod result;
mod review;
mod stats;

pub use product::ProductId;
pub use result::SummaryResult;
pub use review::Review;
pub use stats::SummaryStats;

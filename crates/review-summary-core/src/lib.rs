//! review-summary-core: Core traits and types for the review-summary service
//!
//! This crate provides the data model, the error type and the collaborator
//! traits (review store, generation backend, metrics) shared by the rest of
//! the workspace.

mod error;
mod traits;
mod types;

pub use error::{Result, SummaryError};
pub use traits::*;
pub use types::*;

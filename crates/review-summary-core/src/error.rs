//! Error types for summary operations

use std::time::Duration;

use thiserror::Error;

/// Main error type for all summary operations
///
/// `Clone` because a single computation outcome is handed to every caller
/// that joined it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SummaryError {
    /// The generation backend returned an error
    #[error("generation failed: {0}")]
    Generation(String),

    /// The generation backend did not answer within the deadline
    #[error("generation timed out after {0:?}")]
    GenerationTimeout(Duration),

    /// Review store read or write failed
    #[error("store error: {0}")]
    Store(String),

    /// Stored data could not be encoded or decoded
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Review rejected at the store boundary
    #[error("invalid review: {0}")]
    InvalidReview(String),

    /// The caller's own wait deadline elapsed
    #[error("gave up waiting for summary after {0:?}")]
    WaitTimeout(Duration),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl SummaryError {
    /// Generation backend errored or timed out
    pub fn is_generation_failure(&self) -> bool {
        matches!(
            self,
            SummaryError::Generation(_) | SummaryError::GenerationTimeout(_)
        )
    }

    /// Review store read/write failed
    pub fn is_store_failure(&self) -> bool {
        matches!(self, SummaryError::Store(_) | SummaryError::Serialization(_))
    }

    /// Whether re-invoking the operation may succeed.
    ///
    /// Failures are never cached, so everything except rejected input is
    /// worth another attempt.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, SummaryError::InvalidReview(_))
    }
}

/// Result type alias for summary operations
pub type Result<T> = std::result::Result<T, SummaryError>;

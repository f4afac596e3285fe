//! review-summary-axum: HTTP adapter for the review summary service
//!
//! Routes:
//! - `GET /api/products/{id}/reviews`: reviews plus the persisted summary, if any
//! - `POST /api/products/{id}/reviews/summarize`: get-or-compute the summary

pub mod error;
pub mod routes;

pub use error::ApiError;
pub use routes::{router, ApiConfig, ApiState, ReviewsResponse, SummarizeResponse};

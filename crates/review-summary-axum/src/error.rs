//! Mapping of service failures onto HTTP responses

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use review_summary::SummaryError;

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    retryable: bool,
}

/// A failed request
///
/// Failures are never cached by the service, so retryable ones carry a
/// `Retry-After` hint.
#[derive(Debug)]
pub struct ApiError {
    pub error: SummaryError,
    pub retry_after_secs: u64,
}

impl ApiError {
    pub fn new(error: SummaryError, retry_after_secs: u64) -> Self {
        Self {
            error,
            retry_after_secs,
        }
    }

    pub fn status(&self) -> StatusCode {
        match &self.error {
            SummaryError::Generation(_)
            | SummaryError::GenerationTimeout(_)
            | SummaryError::Store(_)
            | SummaryError::Serialization(_)
            | SummaryError::WaitTimeout(_) => StatusCode::SERVICE_UNAVAILABLE,
            SummaryError::InvalidReview(_) => StatusCode::UNPROCESSABLE_ENTITY,
            SummaryError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let retryable = self.error.is_retryable();
        let body = ErrorBody {
            error: self.error.to_string(),
            retryable,
        };

        let mut response = (status, Json(body)).into_response();
        if retryable && status == StatusCode::SERVICE_UNAVAILABLE {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(self.retry_after_secs));
        }
        response
    }
}

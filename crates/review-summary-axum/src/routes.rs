use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tracing::warn;

use review_summary::{
    ProductId, Review, ReviewStore, SummaryError, SummaryGenerator, SummaryMetrics,
    SummaryService,
};

use crate::error::ApiError;

/// Configuration for the HTTP adapter
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// `Retry-After` seconds sent with retryable failures
    pub retry_after_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            retry_after_secs: 5,
        }
    }
}

/// Router state: the service plus adapter settings
pub struct ApiState<S, G, M>
where
    S: ReviewStore,
    G: SummaryGenerator,
    M: SummaryMetrics,
{
    pub service: SummaryService<S, G, M>,
    pub config: ApiConfig,
}

impl<S, G, M> Clone for ApiState<S, G, M>
where
    S: ReviewStore,
    G: SummaryGenerator,
    M: SummaryMetrics,
{
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            config: self.config.clone(),
        }
    }
}

impl<S, G, M> ApiState<S, G, M>
where
    S: ReviewStore,
    G: SummaryGenerator,
    M: SummaryMetrics,
{
    fn fail(&self, product: ProductId, error: SummaryError) -> ApiError {
        warn!(target: "review_summary", %product, %error, "request failed");
        ApiError::new(error, self.config.retry_after_secs)
    }
}

#[derive(Debug, Serialize)]
pub struct ReviewsResponse {
    pub summary: Option<String>,
    pub reviews: Vec<Review>,
}

#[derive(Debug, Serialize)]
pub struct SummarizeResponse {
    pub summary: Option<String>,
}

/// Build the review routes around a service
pub fn router<S, G, M>(service: SummaryService<S, G, M>, config: ApiConfig) -> Router
where
    S: ReviewStore,
    G: SummaryGenerator,
    M: SummaryMetrics,
{
    Router::new()
        .route("/api/products/{id}/reviews", get(list_reviews::<S, G, M>))
        .route(
            "/api/products/{id}/reviews/summarize",
            post(summarize::<S, G, M>),
        )
        .with_state(ApiState { service, config })
}

/// Reviews plus whatever summary is already persisted; never generates
async fn list_reviews<S, G, M>(
    State(state): State<ApiState<S, G, M>>,
    Path(id): Path<u64>,
) -> Result<Json<ReviewsResponse>, ApiError>
where
    S: ReviewStore,
    G: SummaryGenerator,
    M: SummaryMetrics,
{
    let product = ProductId(id);
    let summary = state
        .service
        .persisted_summary(product)
        .await
        .map_err(|e| state.fail(product, e))?;
    let reviews = state
        .service
        .reviews(product)
        .await
        .map_err(|e| state.fail(product, e))?;

    Ok(Json(ReviewsResponse { summary, reviews }))
}

async fn summarize<S, G, M>(
    State(state): State<ApiState<S, G, M>>,
    Path(id): Path<u64>,
) -> Result<Json<SummarizeResponse>, ApiError>
where
    S: ReviewStore,
    G: SummaryGenerator,
    M: SummaryMetrics,
{
    let product = ProductId(id);
    let result = state
        .service
        .get_or_compute_summary(product)
        .await
        .map_err(|e| state.fail(product, e))?;

    Ok(Json(SummarizeResponse {
        summary: result.into_summary(),
    }))
}

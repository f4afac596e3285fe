//! Runnable review summary server
//!
//! ```text
//! OPENAI_API_KEY=sk-... cargo run -p review-summary-axum --example server
//! curl -X POST localhost:3000/api/products/1/reviews/summarize
//! ```

use chrono::{Duration as ChronoDuration, Utc};
use review_summary::prelude::*;
use review_summary_axum::{router, ApiConfig};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

const SAMPLE_REVIEWS: &[(&str, &str, u8)] = &[
    ("ana", "Battery easily lasts two days of heavy use.", 5),
    ("bo", "Screen is gorgeous but the speakers are tinny.", 4),
    ("cy", "Stopped charging after three weeks. Replacement was quick.", 2),
    ("dee", "Great value for the price, camera is average.", 4),
];

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,review_summary=debug")),
        )
        .init();

    // Seed product 1 so there is something to summarize
    let store = MemoryReviewStore::with_defaults();
    let now = Utc::now();
    for (i, (author, text, rating)) in SAMPLE_REVIEWS.iter().enumerate() {
        let created_at = now - ChronoDuration::hours(i as i64);
        store.add_review(ProductId(1), Review::new(i as u64 + 1, *author, *text, *rating, created_at)?)?;
    }

    let generator = OpenAiGenerator::from_env()?;
    let service = SummaryService::new(store, generator);
    let app = router(service, ApiConfig::default());

    let addr = std::env::var("REVIEW_SUMMARY_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_string());
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}

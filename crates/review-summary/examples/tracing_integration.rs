use review_summary::prelude::*;
use review_summary::TracingMetrics; // Explicit import
use chrono::Utc;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

struct Canned;

#[async_trait]
impl SummaryGenerator for Canned {
    async fn generate(&self, _text: &str) -> Result<String> {
        Ok("Mostly positive, some sizing complaints.".to_string())
    }
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    // 1. Initialize tracing subscriber
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::TRACE) // Enable TRACE to see latency logs
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    // 2. Create the service with TracingMetrics
    let store = MemoryReviewStore::with_defaults();
    store.add_review(ProductId(1), Review::new(1, "kim", "Runs small.", 3, Utc::now())?)?;

    let metrics = TracingMetrics::new().with_service_name("example-service");
    let service = SummaryService::with_metrics(
        store,
        Canned,
        metrics,
        SummaryServiceConfig::default(),
    );

    println!("\n⚡ First request (miss, generates)...");
    let first = service.get_or_compute_summary(ProductId(1)).await?;
    println!("   Got: {:?}", first);

    println!("\n⚡ Second request (hit)...");
    let second = service.get_or_compute_summary(ProductId(1)).await?;
    println!("   Got: {:?}", second);

    println!("\n⚡ Product without reviews...");
    let none = service.get_or_compute_summary(ProductId(99)).await?;
    println!("   Got: {:?}", none);

    println!("\n✅ Check your console output for structured logs!");

    Ok(())
}

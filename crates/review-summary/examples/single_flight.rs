use review_summary::prelude::*;
use chrono::Utc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

/// Slow generator that counts how often it actually runs
struct SlowGenerator {
    calls: AtomicUsize,
}

#[async_trait]
impl SummaryGenerator for SlowGenerator {
    async fn generate(&self, text: &str) -> Result<String> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        println!("Generating... (call {}, {} chars of input)", n, text.len());
        sleep(Duration::from_millis(500)).await;
        Ok("Customers like the battery life.".to_string())
    }
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    // 1. Seed a store with three reviews for product 42
    let store = MemoryReviewStore::with_defaults();
    let product = ProductId(42);
    for (id, text) in ["Battery lasts two days.", "Charges fast.", "Battery is great, case is flimsy."]
        .into_iter()
        .enumerate()
    {
        store.add_review(product, Review::new(id as u64 + 1, "shopper", text, 5, Utc::now())?)?;
    }

    let generator = Arc::new(SlowGenerator {
        calls: AtomicUsize::new(0),
    });
    let service = SummaryService::new(store, generator.clone());

    println!("Spawning 10 concurrent requests for product {}...", product);

    // 2. Launch concurrent requests
    let mut handles = Vec::new();
    for _ in 0..10 {
        let service = service.clone();
        handles.push(tokio::spawn(async move {
            service.get_or_compute_summary(product).await
        }));
    }

    for h in handles {
        let result = h.await??;
        println!("  {:?}", result);
    }

    // 3. Verify coalescing
    let total = generator.calls.load(Ordering::SeqCst);
    println!("Total generation calls: {}", total);
    if total != 1 {
        panic!("Single-flight failed! Expected 1 generation, got {}", total);
    }

    // 4. A later request never regenerates
    let again = service.get_or_compute_summary(product).await?;
    println!("Later request: {:?}", again);

    Ok(())
}

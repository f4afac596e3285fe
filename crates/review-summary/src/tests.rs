//! Integration tests for SummaryService

#[cfg(test)]
mod tests {
    use crate::prelude::*;
    use chrono::{TimeZone, Utc};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tokio_test::assert_ok;

    const BATTERY: &str = "Customers like the battery life.";

    #[derive(Debug, Clone)]
    enum Mode {
        Reply(String),
        Fail,
        Hang,
        Empty,
        Panic,
    }

    /// Generator that counts calls and records its last input
    struct FakeGenerator {
        calls: AtomicUsize,
        delay: Duration,
        mode: Mutex<Mode>,
        last_input: Mutex<Option<String>>,
    }

    impl FakeGenerator {
        fn new(mode: Mode, delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                delay,
                mode: Mutex::new(mode),
                last_input: Mutex::new(None),
            })
        }

        fn replying(text: &str) -> Arc<Self> {
            Self::new(Mode::Reply(text.to_string()), Duration::ZERO)
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn set_mode(&self, mode: Mode) {
            *self.mode.lock().unwrap() = mode;
        }

        fn last_input(&self) -> Option<String> {
            self.last_input.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl SummaryGenerator for FakeGenerator {
        async fn generate(&self, text: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_input.lock().unwrap() = Some(text.to_string());
            let mode = self.mode.lock().unwrap().clone();

            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }

            match mode {
                Mode::Reply(text) => Ok(text),
                Mode::Fail => Err(SummaryError::Generation("upstream 503".to_string())),
                Mode::Hang => std::future::pending().await,
                Mode::Empty => Ok("   ".to_string()),
                Mode::Panic => panic!("generator exploded"),
            }
        }
    }

    /// Memory store whose reads or writes can be made to fail
    #[derive(Clone, Default)]
    struct FlakyStore {
        inner: MemoryReviewStore,
        fail_reads: Arc<AtomicBool>,
        fail_writes: Arc<AtomicBool>,
    }

    #[async_trait]
    impl ReviewStore for FlakyStore {
        async fn get_summary(&self, product: ProductId) -> Result<Option<String>> {
            if self.fail_reads.load(Ordering::SeqCst) {
                return Err(SummaryError::Store("read refused".to_string()));
            }
            self.inner.get_summary(product).await
        }

        async fn set_summary(&self, product: ProductId, summary: &str) -> Result<()> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(SummaryError::Store("disk full".to_string()));
            }
            self.inner.set_summary(product, summary).await
        }

        async fn get_recent_reviews(&self, product: ProductId, limit: usize) -> Result<Vec<Review>> {
            self.inner.get_recent_reviews(product, limit).await
        }
    }

    fn seed(store: &MemoryReviewStore, product: ProductId, count: u64) {
        for id in 1..=count {
            let review = Review::new(
                id,
                format!("author{id}"),
                format!("review {id}"),
                4,
                Utc.timestamp_opt(1_700_000_000 + id as i64, 0).unwrap(),
            )
            .unwrap();
            store.add_review(product, review).unwrap();
        }
    }

    fn service_with(
        store: MemoryReviewStore,
        generator: Arc<FakeGenerator>,
    ) -> SummaryService<MemoryReviewStore, Arc<FakeGenerator>> {
        SummaryService::new(store, generator)
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_first_calls_share_one_generation() {
        let store = MemoryReviewStore::with_defaults();
        let product = ProductId(42);
        seed(&store, product, 3);

        let generator = FakeGenerator::new(
            Mode::Reply(BATTERY.to_string()),
            Duration::from_millis(100),
        );
        let service = service_with(store.clone(), generator.clone());

        let handles: Vec<_> = (0..5)
            .map(|_| {
                let service = service.clone();
                tokio::spawn(async move { service.get_or_compute_summary(product).await })
            })
            .collect();

        let mut results = Vec::new();
        for handle in handles {
            results.push(handle.await.unwrap().unwrap());
        }

        assert_eq!(generator.calls(), 1);
        assert!(results.iter().all(|r| r.summary() == Some(BATTERY)));
        assert_eq!(results.iter().filter(|r| r.is_generated()).count(), 1);
        assert_eq!(
            store.get_summary(product).await.unwrap().as_deref(),
            Some(BATTERY)
        );

        // A later call is served from the store
        let sixth = service.get_or_compute_summary(product).await.unwrap();
        assert_eq!(sixth, SummaryResult::Cached(BATTERY.to_string()));
        assert_eq!(generator.calls(), 1);
        assert_eq!(store.stats().summary_writes, 1);
    }

    #[tokio::test]
    async fn test_product_without_reviews_never_generates() {
        let store = MemoryReviewStore::with_defaults();
        let generator = FakeGenerator::replying(BATTERY);
        let service = service_with(store.clone(), generator.clone());

        let result = service.get_or_compute_summary(ProductId(7)).await.unwrap();

        assert_eq!(result, SummaryResult::NoReviews);
        assert_eq!(result.into_summary(), None);
        assert_eq!(generator.calls(), 0);
        assert_eq!(store.get_summary(ProductId(7)).await.unwrap(), None);
        assert_eq!(service.stats().writes, 0);
        assert_eq!(service.in_flight(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_generation_timeout_reaches_all_callers_and_retries() {
        let store = MemoryReviewStore::with_defaults();
        let product = ProductId(9);
        seed(&store, product, 2);

        let generator = FakeGenerator::new(Mode::Hang, Duration::ZERO);
        let config = SummaryServiceConfig::default().generation_timeout(Duration::from_millis(50));
        let service = SummaryService::with_config(store.clone(), generator.clone(), config);

        let handles: Vec<_> = (0..3)
            .map(|_| {
                let service = service.clone();
                tokio::spawn(async move { service.get_or_compute_summary(product).await })
            })
            .collect();

        for handle in handles {
            let err = handle.await.unwrap().unwrap_err();
            assert_eq!(err, SummaryError::GenerationTimeout(Duration::from_millis(50)));
            assert!(err.is_retryable());
        }

        assert_eq!(store.get_summary(product).await.unwrap(), None);
        assert_eq!(service.in_flight(), 0);
        let calls_after_failure = generator.calls();
        assert!(calls_after_failure >= 1);

        // No negative caching: the next call generates again
        generator.set_mode(Mode::Reply("Recovered.".to_string()));
        let result = service.get_or_compute_summary(product).await.unwrap();
        assert_eq!(result, SummaryResult::Generated("Recovered.".to_string()));
        assert_eq!(generator.calls(), calls_after_failure + 1);
    }

    #[tokio::test]
    async fn test_persisted_summary_is_never_regenerated() {
        let store = MemoryReviewStore::with_defaults();
        let product = ProductId(1);
        seed(&store, product, 2);

        let generator = FakeGenerator::replying("first");
        let service = service_with(store.clone(), generator.clone());

        let first = service.get_or_compute_summary(product).await.unwrap();
        assert!(first.is_generated());

        // New reviews do not invalidate a persisted summary
        let late = Review::new(99, "late", "changed my mind", 1, Utc::now()).unwrap();
        store.add_review(product, late).unwrap();
        generator.set_mode(Mode::Reply("second".to_string()));

        for _ in 0..3 {
            let again = service.get_or_compute_summary(product).await.unwrap();
            assert_eq!(again, SummaryResult::Cached("first".to_string()));
        }
        assert_eq!(generator.calls(), 1);
    }

    #[tokio::test]
    async fn test_prestored_summary_skips_generation() {
        let store = MemoryReviewStore::with_defaults();
        let product = ProductId(3);
        store.set_summary(product, "from a previous run").await.unwrap();

        let generator = FakeGenerator::replying("unused");
        let service = service_with(store, generator.clone());

        let result = service.get_or_compute_summary(product).await.unwrap();
        assert!(result.is_cached());
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn test_generation_failure_is_not_cached() {
        let store = MemoryReviewStore::with_defaults();
        let product = ProductId(11);
        seed(&store, product, 1);

        let generator = FakeGenerator::new(Mode::Fail, Duration::ZERO);
        let service = service_with(store.clone(), generator.clone());

        let err = service.get_or_compute_summary(product).await.unwrap_err();
        assert!(err.is_generation_failure());
        assert_eq!(store.get_summary(product).await.unwrap(), None);
        assert_eq!(store.stats().summary_writes, 0);

        let err = service.get_or_compute_summary(product).await.unwrap_err();
        assert!(err.is_generation_failure());
        assert_eq!(generator.calls(), 2);
        assert_eq!(service.stats().failures, 2);
    }

    #[tokio::test]
    async fn test_write_failure_fails_the_computation() {
        let store = FlakyStore::default();
        let product = ProductId(12);
        seed(&store.inner, product, 2);
        store.fail_writes.store(true, Ordering::SeqCst);

        let generator = FakeGenerator::replying("good");
        let service = SummaryService::new(store.clone(), generator.clone());

        let err = service.get_or_compute_summary(product).await.unwrap_err();
        assert!(err.is_store_failure());
        assert_eq!(store.inner.get_summary(product).await.unwrap(), None);

        store.fail_writes.store(false, Ordering::SeqCst);
        let result = service.get_or_compute_summary(product).await.unwrap();
        assert_eq!(result, SummaryResult::Generated("good".to_string()));
        assert_eq!(generator.calls(), 2);
    }

    #[tokio::test]
    async fn test_read_failure_surfaces_without_generation() {
        let store = FlakyStore::default();
        let product = ProductId(13);
        seed(&store.inner, product, 2);
        store.fail_reads.store(true, Ordering::SeqCst);

        let generator = FakeGenerator::replying("unused");
        let service = SummaryService::new(store, generator.clone());

        let err = service.get_or_compute_summary(product).await.unwrap_err();
        assert_eq!(err, SummaryError::Store("read refused".to_string()));
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_released_summary_is_already_persisted() {
        let store = MemoryReviewStore::with_defaults();
        let product = ProductId(21);
        seed(&store, product, 4);

        let generator = FakeGenerator::new(Mode::Reply("durable".into()), Duration::from_millis(50));
        let service = service_with(store.clone(), generator);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let service = service.clone();
                let store = store.clone();
                tokio::spawn(async move {
                    let result = service.get_or_compute_summary(product).await.unwrap();
                    let stored = store.get_summary(product).await.unwrap();
                    (result.into_summary(), stored)
                })
            })
            .collect();

        for handle in handles {
            let (released, stored) = handle.await.unwrap();
            assert_eq!(released.as_deref(), Some("durable"));
            assert_eq!(stored, released);
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_cancelled_waiter_does_not_disturb_leader() {
        let store = MemoryReviewStore::with_defaults();
        let product = ProductId(31);
        seed(&store, product, 2);

        let generator = FakeGenerator::new(Mode::Reply("patient".into()), Duration::from_millis(200));
        let service = service_with(store.clone(), generator.clone());

        let leader = {
            let service = service.clone();
            tokio::spawn(async move { service.get_or_compute_summary(product).await })
        };
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(service.is_computing(product));

        let err = service
            .get_or_compute_summary_within(product, Duration::from_millis(20))
            .await
            .unwrap_err();
        assert_eq!(err, SummaryError::WaitTimeout(Duration::from_millis(20)));

        let result = leader.await.unwrap().unwrap();
        assert_eq!(result, SummaryResult::Generated("patient".to_string()));
        assert_eq!(generator.calls(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_abandoned_leader_call_still_persists() {
        let store = MemoryReviewStore::with_defaults();
        let product = ProductId(32);
        seed(&store, product, 2);

        let generator = FakeGenerator::new(Mode::Reply("finished anyway".into()), Duration::from_millis(100));
        let service = service_with(store.clone(), generator.clone());

        let err = service
            .get_or_compute_summary_within(product, Duration::from_millis(10))
            .await
            .unwrap_err();
        assert!(matches!(err, SummaryError::WaitTimeout(_)));

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(!service.is_computing(product));

        let result = service.get_or_compute_summary(product).await.unwrap();
        assert_eq!(result, SummaryResult::Cached("finished anyway".to_string()));
        assert_eq!(generator.calls(), 1);
    }

    #[tokio::test]
    async fn test_default_wait_timeout_from_config() {
        let store = MemoryReviewStore::with_defaults();
        let product = ProductId(33);
        seed(&store, product, 1);

        let generator = FakeGenerator::new(Mode::Hang, Duration::ZERO);
        let config = SummaryServiceConfig::default()
            .no_generation_timeout()
            .wait_timeout(Duration::from_millis(20));
        let service = SummaryService::with_config(store, generator, config);

        let err = service.get_or_compute_summary(product).await.unwrap_err();
        assert_eq!(err, SummaryError::WaitTimeout(Duration::from_millis(20)));
        // The hanging computation is still registered
        assert!(service.is_computing(product));
    }

    #[tokio::test]
    async fn test_generation_input_uses_recent_reviews_in_order() {
        let store = MemoryReviewStore::with_defaults();
        let product = ProductId(41);
        seed(&store, product, 12);

        let generator = FakeGenerator::replying("ok");
        let service = service_with(store, generator.clone());
        assert_ok!(service.get_or_compute_summary(product).await);

        let input = generator.last_input().unwrap();
        let expected: Vec<String> = (3..=12).rev().map(|id| format!("review {id}")).collect();
        assert_eq!(input, expected.join("\n\n"));
    }

    #[tokio::test]
    async fn test_custom_limit_and_separator() {
        let store = MemoryReviewStore::with_defaults();
        let product = ProductId(42);
        seed(&store, product, 5);

        let generator = FakeGenerator::replying("ok");
        let config = SummaryServiceConfig::with_review_limit(2).separator(" | ");
        let service = SummaryService::with_config(store, generator.clone(), config);
        assert_ok!(service.get_or_compute_summary(product).await);

        assert_eq!(generator.last_input().as_deref(), Some("review 5 | review 4"));
    }

    #[tokio::test]
    async fn test_empty_generation_is_a_failure() {
        let store = MemoryReviewStore::with_defaults();
        let product = ProductId(51);
        seed(&store, product, 1);

        let generator = FakeGenerator::new(Mode::Empty, Duration::ZERO);
        let service = service_with(store.clone(), generator);

        let err = service.get_or_compute_summary(product).await.unwrap_err();
        assert!(err.is_generation_failure());
        assert_eq!(store.get_summary(product).await.unwrap(), None);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_panicking_generator_releases_waiters() {
        let store = MemoryReviewStore::with_defaults();
        let product = ProductId(61);
        seed(&store, product, 1);

        let generator = FakeGenerator::new(Mode::Panic, Duration::from_millis(20));
        let service = service_with(store, generator.clone());

        let err = service.get_or_compute_summary(product).await.unwrap_err();
        assert!(matches!(err, SummaryError::Internal(_)));
        assert_eq!(service.in_flight(), 0);

        generator.set_mode(Mode::Reply("calm again".into()));
        let result = service.get_or_compute_summary(product).await.unwrap();
        assert!(result.is_generated());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_products_are_independent() {
        let store = MemoryReviewStore::with_defaults();
        seed(&store, ProductId(71), 1);
        seed(&store, ProductId(72), 1);

        let generator = FakeGenerator::new(Mode::Reply("same text".into()), Duration::from_millis(50));
        let service = service_with(store.clone(), generator.clone());

        let (a, b) = tokio::join!(
            service.get_or_compute_summary(ProductId(71)),
            service.get_or_compute_summary(ProductId(72)),
        );
        assert!(a.unwrap().is_generated());
        assert!(b.unwrap().is_generated());
        assert_eq!(generator.calls(), 2);
        assert_eq!(store.summary_count(), 2);
    }

    #[tokio::test]
    async fn test_stats() {
        let store = MemoryReviewStore::with_defaults();
        let product = ProductId(81);
        seed(&store, product, 1);

        let service = service_with(store, FakeGenerator::replying("ok"));

        service.get_or_compute_summary(product).await.unwrap(); // Miss + generation
        service.get_or_compute_summary(product).await.unwrap(); // Hit
        service.get_or_compute_summary(ProductId(82)).await.unwrap(); // Miss, no reviews

        let stats = service.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 2);
        assert_eq!(stats.generations, 1);
        assert_eq!(stats.writes, 1);
        assert_eq!(stats.failures, 0);
        assert_eq!(stats.in_flight, 0);
    }

    #[tokio::test]
    async fn test_clone_shares_state() {
        let store = MemoryReviewStore::with_defaults();
        let product = ProductId(91);
        seed(&store, product, 1);

        let generator = FakeGenerator::replying("shared");
        let service1 = service_with(store, generator.clone());
        let service2 = service1.clone();

        service1.get_or_compute_summary(product).await.unwrap();
        assert!(service2.get_or_compute_summary(product).await.unwrap().is_cached());
        assert_eq!(service2.stats().generations, 1);
    }
}

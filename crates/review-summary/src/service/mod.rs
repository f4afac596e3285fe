//! Summary cache-and-compute service

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use review_summary_core::{
    FailureKind, NoopMetrics, ProductId, Result, Review, ReviewStore, SummaryError,
    SummaryGenerator, SummaryMetrics, SummaryOperation, SummaryResult, SummaryStats,
};

mod coalescer;
use coalescer::{Coalescer, Role};

/// Configuration for SummaryService
#[derive(Debug, Clone)]
pub struct SummaryServiceConfig {
    /// Most recent reviews fed to the generator
    pub review_limit: usize,
    /// Text placed between review contents in the generation input
    pub separator: String,
    /// Deadline for one generation call; `None` waits indefinitely
    pub generation_timeout: Option<Duration>,
    /// Default deadline for a caller's own wait; `None` waits indefinitely
    pub wait_timeout: Option<Duration>,
}

impl Default for SummaryServiceConfig {
    fn default() -> Self {
        Self {
            review_limit: 10,
            separator: "\n\n".to_string(),
            generation_timeout: Some(Duration::from_secs(30)),
            wait_timeout: None,
        }
    }
}

impl SummaryServiceConfig {
    /// Create config with a specific review limit
    pub fn with_review_limit(limit: usize) -> Self {
        Self {
            review_limit: limit,
            ..Default::default()
        }
    }

    /// Set the generation deadline
    pub fn generation_timeout(mut self, timeout: Duration) -> Self {
        self.generation_timeout = Some(timeout);
        self
    }

    /// Let generation run as long as the backend takes
    pub fn no_generation_timeout(mut self) -> Self {
        self.generation_timeout = None;
        self
    }

    /// Set the default caller wait deadline
    pub fn wait_timeout(mut self, timeout: Duration) -> Self {
        self.wait_timeout = Some(timeout);
        self
    }

    /// Set the review separator
    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }
}

#[derive(Debug, Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    coalesced: AtomicU64,
    generations: AtomicU64,
    failures: AtomicU64,
    writes: AtomicU64,
}

impl Counters {
    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

/// Get-or-compute service for product review summaries
///
/// A persisted summary is returned as-is. Otherwise one caller per product
/// becomes leader and runs fetch → generate → persist while every concurrent
/// caller for that product waits on the same outcome. The write-back
/// happens before anyone is released, so a released summary is always
/// readable from the store.
///
/// Generic over:
/// - `S`: The review store (Memory, Redis)
/// - `G`: The generation backend
/// - `M`: The metrics collector
pub struct SummaryService<S, G, M = NoopMetrics>
where
    S: ReviewStore,
    G: SummaryGenerator,
    M: SummaryMetrics,
{
    store: Arc<S>,
    generator: Arc<G>,
    metrics: Arc<M>,
    config: Arc<SummaryServiceConfig>,
    coalescer: Coalescer<ProductId, SummaryResult>,
    counters: Arc<Counters>,
}

// Constructors for default metrics
impl<S: ReviewStore, G: SummaryGenerator> SummaryService<S, G, NoopMetrics> {
    /// Create a new SummaryService with default config and no metrics
    pub fn new(store: S, generator: G) -> Self {
        Self::with_config(store, generator, SummaryServiceConfig::default())
    }

    /// Create with custom config
    pub fn with_config(store: S, generator: G, config: SummaryServiceConfig) -> Self {
        Self::with_metrics(store, generator, NoopMetrics, config)
    }
}

impl<S, G, M> SummaryService<S, G, M>
where
    S: ReviewStore,
    G: SummaryGenerator,
    M: SummaryMetrics,
{
    /// Create a SummaryService with custom metrics
    pub fn with_metrics(store: S, generator: G, metrics: M, config: SummaryServiceConfig) -> Self {
        Self {
            store: Arc::new(store),
            generator: Arc::new(generator),
            metrics: Arc::new(metrics),
            config: Arc::new(config),
            coalescer: Coalescer::new(),
            counters: Arc::new(Counters::default()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &SummaryServiceConfig {
        &self.config
    }

    /// Return the product's summary, generating and persisting it if absent.
    ///
    /// Waits at most `wait_timeout` from the config when one is set.
    pub async fn get_or_compute_summary(&self, product: ProductId) -> Result<SummaryResult> {
        match self.config.wait_timeout {
            Some(wait) => self.get_or_compute_summary_within(product, wait).await,
            None => self.resolve(product).await,
        }
    }

    /// Like [`get_or_compute_summary`](Self::get_or_compute_summary), giving up
    /// after `wait`.
    ///
    /// Giving up only ends this caller's wait. A computation already running
    /// keeps going, persists its result and releases the other callers.
    pub async fn get_or_compute_summary_within(
        &self,
        product: ProductId,
        wait: Duration,
    ) -> Result<SummaryResult> {
        tokio::time::timeout(wait, self.resolve(product))
            .await
            .map_err(|_| SummaryError::WaitTimeout(wait))?
    }

    /// Read the persisted summary without computing anything
    pub async fn persisted_summary(&self, product: ProductId) -> Result<Option<String>> {
        self.timed(SummaryOperation::ReadSummary, self.store.get_summary(product))
            .await
    }

    /// Reviews for a product, most recent first
    pub async fn reviews(&self, product: ProductId) -> Result<Vec<Review>> {
        self.timed(SummaryOperation::FetchReviews, self.store.get_reviews(product))
            .await
    }

    /// Whether a computation for `product` is currently running
    pub fn is_computing(&self, product: ProductId) -> bool {
        self.coalescer.is_in_flight(&product)
    }

    /// Number of computations currently running
    pub fn in_flight(&self) -> usize {
        self.coalescer.len()
    }

    /// Snapshot of request statistics
    pub fn stats(&self) -> SummaryStats {
        let c = &self.counters;
        SummaryStats {
            hits: c.hits.load(Ordering::Relaxed),
            misses: c.misses.load(Ordering::Relaxed),
            coalesced: c.coalesced.load(Ordering::Relaxed),
            generations: c.generations.load(Ordering::Relaxed),
            failures: c.failures.load(Ordering::Relaxed),
            writes: c.writes.load(Ordering::Relaxed),
            in_flight: self.coalescer.len(),
        }
    }

    async fn resolve(&self, product: ProductId) -> Result<SummaryResult> {
        // Fast path: no registry access once a summary exists
        if let Some(summary) = self.persisted_summary(product).await? {
            Counters::bump(&self.counters.hits);
            self.metrics.record_hit(product);
            return Ok(SummaryResult::Cached(summary));
        }
        Counters::bump(&self.counters.misses);
        self.metrics.record_miss(product);

        match self.coalescer.join_or_lead(product) {
            Role::Follower(waiter) => {
                Counters::bump(&self.counters.coalesced);
                self.metrics.record_coalesced(product);
                debug!(target: "review_summary", %product, "joined in-flight computation");
                waiter.wait().await.map(SummaryResult::joined)
            }
            Role::Leader(flight) => {
                debug!(target: "review_summary", %product, "elected leader");
                let waiter = flight.subscribe();
                // Detached so that cancelling this caller cannot abort the
                // computation other callers are waiting on
                let service = self.clone();
                tokio::spawn(async move {
                    let outcome = service.compute(product).await;
                    flight.complete(outcome);
                });
                waiter.wait().await
            }
        }
    }

    /// Leader-only: compute, persist and report
    async fn compute(&self, product: ProductId) -> Result<SummaryResult> {
        let outcome = self.fetch_generate_persist(product).await;
        match &outcome {
            Ok(SummaryResult::Generated(_)) => {
                info!(target: "review_summary", %product, "summary generated and stored");
            }
            Ok(SummaryResult::NoReviews) => {
                debug!(target: "review_summary", %product, "no reviews to summarize");
            }
            Ok(_) => {}
            Err(err) => {
                Counters::bump(&self.counters.failures);
                self.metrics.record_failure(product, FailureKind::of(err));
                warn!(target: "review_summary", %product, error = %err, "summary computation failed");
            }
        }
        outcome
    }

    async fn fetch_generate_persist(&self, product: ProductId) -> Result<SummaryResult> {
        // Another leader may have persisted between our fast-path read and
        // our election
        if let Some(summary) = self.persisted_summary(product).await? {
            return Ok(SummaryResult::Cached(summary));
        }

        let reviews = self
            .timed(
                SummaryOperation::FetchReviews,
                self.store
                    .get_recent_reviews(product, self.config.review_limit),
            )
            .await?;

        let Some(input) = join_reviews(&reviews, &self.config.separator) else {
            return Ok(SummaryResult::NoReviews);
        };

        let summary = self
            .timed(SummaryOperation::Generate, self.generate(&input))
            .await?;

        // Persist before release: a write failure fails the whole computation
        self.timed(
            SummaryOperation::WriteSummary,
            self.store.set_summary(product, &summary),
        )
        .await?;
        Counters::bump(&self.counters.writes);

        Ok(SummaryResult::Generated(summary))
    }

    async fn generate(&self, input: &str) -> Result<String> {
        Counters::bump(&self.counters.generations);
        let call = self.generator.generate(input);
        let summary = match self.config.generation_timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| SummaryError::GenerationTimeout(limit))??,
            None => call.await?,
        };

        // Empty text would read back as "absent" and must not be persisted
        if summary.trim().is_empty() {
            return Err(SummaryError::Generation(
                "backend returned an empty summary".to_string(),
            ));
        }
        Ok(summary)
    }

    async fn timed<T>(&self, operation: SummaryOperation, fut: impl Future<Output = T>) -> T {
        let start = Instant::now();
        let out = fut.await;
        self.metrics.record_latency(operation, start.elapsed());
        out
    }
}

/// Join review contents in retrieval order, skipping blank ones.
///
/// Returns `None` when there is nothing to summarize.
fn join_reviews(reviews: &[Review], separator: &str) -> Option<String> {
    let contents: Vec<&str> = reviews
        .iter()
        .map(|r| r.content.as_str())
        .filter(|c| !c.trim().is_empty())
        .collect();

    if contents.is_empty() {
        None
    } else {
        Some(contents.join(separator))
    }
}

impl<S, G, M> Clone for SummaryService<S, G, M>
where
    S: ReviewStore,
    G: SummaryGenerator,
    M: SummaryMetrics,
{
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            generator: self.generator.clone(),
            metrics: self.metrics.clone(),
            config: self.config.clone(),
            coalescer: self.coalescer.clone(),
            counters: self.counters.clone(),
        }
    }
}

//! Service statistics

/// Statistics for summary requests
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SummaryStats {
    /// Requests answered from the persisted summary
    pub hits: u64,
    /// Requests that found no persisted summary
    pub misses: u64,
    /// Requests that joined an in-flight computation
    pub coalesced: u64,
    /// Generation backend invocations
    pub generations: u64,
    /// Computations that ended in a failure
    pub failures: u64,
    /// Summaries written to the review store
    pub writes: u64,
    /// Computations currently outstanding
    pub in_flight: usize,
}

impl SummaryStats {
    /// Calculate hit ratio (0.0 to 1.0)
    pub fn hit_ratio(&self) -> f64 {
        let total = self.total_requests();
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Total requests (hits + misses)
    pub fn total_requests(&self) -> u64 {
        self.hits + self.misses
    }

    /// Merge stats from another instance
    pub fn merge(&mut self, other: &SummaryStats) {
        self.hits += other.hits;
        self.misses += other.misses;
        self.coalesced += other.coalesced;
        self.generations += other.generations;
        self.failures += other.failures;
        self.writes += other.writes;
        self.in_flight += other.in_flight;
    }
}

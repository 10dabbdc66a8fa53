//! Recommendation Metrics and Performance Monitoring
//!
//! Timing and volume metrics per strategy, emitted through the `metrics` facade.
//! Nothing is recorded unless a recorder is installed (see the `prometheus` feature).

use std::time::Instant;

use super::engine::Strategy;

pub const REQUESTS_TOTAL: &str = "cinematch_recommendations_total";
pub const DURATION_MS: &str = "cinematch_recommendation_duration_ms";
pub const RETURNED: &str = "cinematch_recommendations_returned";

/// Performance timer for tracking one recommendation request
pub struct PerformanceTimer {
    start: Instant,
    strategy: Strategy,
    slow_threshold_ms: u64,
}

impl PerformanceTimer {
    pub fn new(strategy: Strategy, slow_threshold_ms: u64) -> Self {
        ::metrics::counter!(REQUESTS_TOTAL, "strategy" => strategy.as_str()).increment(1);
        Self {
            start: Instant::now(),
            strategy,
            slow_threshold_ms,
        }
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

impl Drop for PerformanceTimer {
    fn drop(&mut self) {
        let elapsed = self.elapsed_ms();
        ::metrics::histogram!(DURATION_MS, "strategy" => self.strategy.as_str()).record(elapsed as f64);

        if elapsed > self.slow_threshold_ms {
            tracing::warn!(
                "Slow recommendation: {} took {}ms (threshold: {}ms)",
                self.strategy.as_str(),
                elapsed,
                self.slow_threshold_ms
            );
        } else {
            tracing::debug!("{} completed in {}ms", self.strategy.as_str(), elapsed);
        }
    }
}

/// Record how many records a strategy produced
pub fn record_returned(strategy: Strategy, count: usize) {
    ::metrics::histogram!(RETURNED, "strategy" => strategy.as_str()).record(count as f64);
}

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Lightweight, lock-free counters for the endpoint an `RpcClientFacade`
/// is bound to. Consulted by operators, never by the engine's own
/// control flow.
#[derive(Debug)]
pub struct EndpointHealth {
    endpoint: String,
    successes: AtomicU64,
    failures: AtomicU64,
    last_latency_micros: AtomicU64,
}

impl EndpointHealth {
    pub fn new(endpoint: String) -> Self {
        Self {
            endpoint,
            successes: AtomicU64::new(0),
            failures: AtomicU64::new(0),
            last_latency_micros: AtomicU64::new(0),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn record_success(&self, latency: Duration) {
        self.successes.fetch_add(1, Ordering::Relaxed);
        self.last_latency_micros
            .store(latency.as_micros() as u64, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn successes(&self) -> u64 {
        self.successes.load(Ordering::Relaxed)
    }

    pub fn failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    pub fn last_latency(&self) -> Duration {
        Duration::from_micros(self.last_latency_micros.load(Ordering::Relaxed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_start_at_zero() {
        let health = EndpointHealth::new("https://example.invalid".to_string());
        assert_eq!(health.successes(), 0);
        assert_eq!(health.failures(), 0);
    }

    #[test]
    fn records_successes_and_failures_independently() {
        let health = EndpointHealth::new("https://example.invalid".to_string());
        health.record_success(Duration::from_millis(12));
        health.record_failure();
        health.record_success(Duration::from_millis(8));
        assert_eq!(health.successes(), 2);
        assert_eq!(health.failures(), 1);
        assert_eq!(health.last_latency(), Duration::from_millis(8));
    }
}

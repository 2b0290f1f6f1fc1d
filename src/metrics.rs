//! Prometheus metrics collection for Chatbridge
//!
//! Tracks relay request counts by terminal outcome and the latency of the
//! upstream completion call. Metrics are exposed via the `/metrics`
//! endpoint in Prometheus text format.

use prometheus::{Encoder, Histogram, HistogramOpts, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::Arc;

/// Terminal request outcome for type-safe metrics labels
///
/// Restricting label values to a closed enum prevents cardinality
/// explosion. `bad-request` terminates in the JSON extractor before the
/// handler runs and is therefore not recorded here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Reply delivered
    Ok,
    /// Credential missing
    Misconfigured,
    /// Upstream rejected the request (non-2xx)
    UpstreamError,
    /// Transport failure, timeout, or parse failure
    InternalError,
}

impl Outcome {
    /// Convert outcome to Prometheus label string
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Ok => "ok",
            Outcome::Misconfigured => "misconfigured",
            Outcome::UpstreamError => "upstream_error",
            Outcome::InternalError => "internal_error",
        }
    }
}

/// Metrics collector for Chatbridge
#[derive(Clone)]
pub struct Metrics {
    pub registry: Arc<Registry>,
    requests_total: IntCounterVec,
    upstream_duration: Histogram,
}

impl Metrics {
    /// Create a new Metrics instance
    ///
    /// Registers all metrics with a new Prometheus registry.
    ///
    /// # Errors
    ///
    /// Returns an error if metric registration fails (e.g., duplicate names).
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        // Counter: relay requests by terminal outcome
        // Cardinality: 4 outcomes = 4 time series
        let requests_total = IntCounterVec::new(
            Opts::new(
                "chatbridge_requests_total",
                "Total number of relay requests by terminal outcome",
            ),
            &["outcome"],
        )?;

        // Histogram: upstream completion call latency
        let upstream_duration = Histogram::with_opts(
            HistogramOpts::new(
                "chatbridge_upstream_duration_ms",
                "Upstream completion call latency in milliseconds",
            )
            .buckets(vec![
                50.0, 100.0, 250.0, 500.0, 1000.0, 2500.0, 5000.0, 10000.0, 30000.0,
            ]),
        )?;

        registry.register(Box::new(requests_total.clone()))?;
        registry.register(Box::new(upstream_duration.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            requests_total,
            upstream_duration,
        })
    }

    /// Record a completed relay request
    ///
    /// # Errors
    ///
    /// Returns an error if the label lookup fails. Callers log and continue;
    /// observability must never fail a request.
    pub fn record_request(&self, outcome: Outcome) -> Result<(), prometheus::Error> {
        self.requests_total
            .get_metric_with_label_values(&[outcome.as_str()])?
            .inc();
        Ok(())
    }

    /// Record the latency of one upstream call
    pub fn observe_upstream_duration(&self, duration_ms: f64) {
        self.upstream_duration.observe(duration_ms);
    }

    /// Encode all registered metrics in Prometheus text format
    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        String::from_utf8(buffer)
            .map_err(|e| prometheus::Error::Msg(format!("metrics are not valid UTF-8: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_label_values() {
        assert_eq!(Outcome::Ok.as_str(), "ok");
        assert_eq!(Outcome::Misconfigured.as_str(), "misconfigured");
        assert_eq!(Outcome::UpstreamError.as_str(), "upstream_error");
        assert_eq!(Outcome::InternalError.as_str(), "internal_error");
    }

    #[test]
    fn test_metrics_new_registers_without_error() {
        assert!(Metrics::new().is_ok());
    }

    #[test]
    fn test_record_request_increments_counter() {
        let metrics = Metrics::new().expect("should create metrics");
        metrics
            .record_request(Outcome::Ok)
            .expect("should record outcome");
        metrics
            .record_request(Outcome::Ok)
            .expect("should record outcome");

        let encoded = metrics.encode().expect("should encode");
        assert!(encoded.contains("chatbridge_requests_total{outcome=\"ok\"} 2"));
    }

    #[test]
    fn test_encode_includes_all_metric_names() {
        let metrics = Metrics::new().expect("should create metrics");
        metrics.observe_upstream_duration(123.0);
        metrics
            .record_request(Outcome::UpstreamError)
            .expect("should record outcome");

        let encoded = metrics.encode().expect("should encode");
        assert!(encoded.contains("chatbridge_requests_total"));
        assert!(encoded.contains("chatbridge_upstream_duration_ms"));
    }
}

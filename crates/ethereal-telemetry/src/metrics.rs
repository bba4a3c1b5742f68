//! Prometheus metrics for intent signing and submission.
//!
//! # Panics
//!
//! Metric registration uses `unwrap()` intentionally. If registration fails,
//! it indicates a fatal configuration error (e.g., duplicate metric names)
//! that should cause an immediate crash at startup rather than silent failure.
//! These panics only occur during static initialization, never at runtime.

use crate::error::{TelemetryError, TelemetryResult};
use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_histogram, register_histogram_vec, register_int_gauge,
    CounterVec, Encoder, Histogram, HistogramVec, IntGauge, TextEncoder,
};

/// Total intents signed.
/// Labels: kind (order/cancel)
pub static INTENTS_SIGNED_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "ethereal_intents_signed_total",
        "Total intents signed",
        &["kind"]
    )
    .unwrap()
});

/// Total submissions by outcome.
/// Labels: kind (order/cancel), outcome (ok/signing_error/transport_error/decode_error/cancelled/...)
pub static SUBMISSIONS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "ethereal_submissions_total",
        "Total intent submissions by outcome",
        &["kind", "outcome"]
    )
    .unwrap()
});

/// Round-trip latency of one submission in milliseconds.
pub static SUBMISSION_LATENCY_MS: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "ethereal_submission_latency_ms",
        "Intent submission round-trip latency in milliseconds",
        &["kind"],
        vec![5.0, 10.0, 20.0, 50.0, 100.0, 200.0, 500.0, 1000.0, 2000.0, 5000.0, 10000.0]
    )
    .unwrap()
});

/// Number of intents per batch call.
pub static BATCH_SIZE: Lazy<Histogram> = Lazy::new(|| {
    register_histogram!(
        "ethereal_batch_size",
        "Number of intents per batch submission",
        vec![1.0, 2.0, 5.0, 10.0, 20.0, 50.0, 100.0, 200.0, 500.0]
    )
    .unwrap()
});

/// Submissions currently on the wire.
pub static SUBMISSIONS_INFLIGHT: Lazy<IntGauge> = Lazy::new(|| {
    register_int_gauge!(
        "ethereal_submissions_inflight",
        "Intent submissions currently in flight"
    )
    .unwrap()
});

/// Metrics facade for easy access.
pub struct Metrics;

impl Metrics {
    pub fn intent_signed(kind: &str) {
        INTENTS_SIGNED_TOTAL.with_label_values(&[kind]).inc();
    }

    /// Record the final outcome of one submission.
    pub fn submission(kind: &str, outcome: &str) {
        SUBMISSIONS_TOTAL.with_label_values(&[kind, outcome]).inc();
    }

    pub fn submission_latency(kind: &str, latency_ms: f64) {
        SUBMISSION_LATENCY_MS
            .with_label_values(&[kind])
            .observe(latency_ms);
    }

    pub fn batch_size(size: usize) {
        BATCH_SIZE.observe(size as f64);
    }

    pub fn inflight_inc() {
        SUBMISSIONS_INFLIGHT.inc();
    }

    pub fn inflight_dec() {
        SUBMISSIONS_INFLIGHT.dec();
    }

    /// Render every registered metric in the Prometheus text format.
    pub fn render() -> TelemetryResult<String> {
        let mut buf = Vec::new();
        TextEncoder::new()
            .encode(&prometheus::gather(), &mut buf)
            .map_err(|e| TelemetryError::Metrics(e.to_string()))?;
        String::from_utf8(buf).map_err(|e| TelemetryError::Metrics(e.to_string()))
    }
}

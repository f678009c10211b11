//! Metrics collection for health-coach-service.
//!
//! HTTP request metrics arrive through the `metrics` facade (see
//! `service_core::middleware::metrics`) and are rendered by the Prometheus
//! recorder; analysis-specific counters live in a `prometheus` registry.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::{Once, OnceLock};
use std::time::Duration;

pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();
pub static PROMETHEUS_REGISTRY: OnceLock<Registry> = OnceLock::new();
pub static ANALYSIS_REQUESTS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();
pub static GENERATION_DURATION_SECONDS: OnceLock<HistogramVec> = OnceLock::new();
pub static EMAILS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

static INIT: Once = Once::new();

/// Initialize metrics collection. Later calls are no-ops.
pub fn init_metrics() {
    INIT.call_once(|| {
        match PrometheusBuilder::new().install_recorder() {
            Ok(handle) => {
                let _ = METRICS_HANDLE.set(handle);
            }
            Err(e) => tracing::warn!(error = %e, "Failed to install Prometheus recorder"),
        }

        if let Err(e) = register_custom_metrics() {
            tracing::error!(error = %e, "Failed to register analysis metrics");
            return;
        }

        tracing::info!("Prometheus metrics initialized");
    });
}

fn register_custom_metrics() -> Result<(), prometheus::Error> {
    let registry = Registry::new();

    let analysis_requests = IntCounterVec::new(
        Opts::new(
            "analysis_requests_total",
            "Analysis requests by outcome (rejected, generation_failed, completed)",
        ),
        &["outcome"],
    )?;

    let generation_duration = HistogramVec::new(
        HistogramOpts::new(
            "analysis_generation_duration_seconds",
            "Analysis generator latency in seconds",
        )
        .buckets(vec![0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0, 60.0, 120.0]),
        &["provider", "status"],
    )?;

    let emails = IntCounterVec::new(
        Opts::new("analysis_emails_total", "Analysis emails by provider and status"),
        &["provider", "status"],
    )?;

    registry.register(Box::new(analysis_requests.clone()))?;
    registry.register(Box::new(generation_duration.clone()))?;
    registry.register(Box::new(emails.clone()))?;

    let _ = PROMETHEUS_REGISTRY.set(registry);
    let _ = ANALYSIS_REQUESTS_TOTAL.set(analysis_requests);
    let _ = GENERATION_DURATION_SECONDS.set(generation_duration);
    let _ = EMAILS_TOTAL.set(emails);

    Ok(())
}

/// Get metrics output in Prometheus text format.
pub fn get_metrics() -> String {
    let mut output = METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_default();

    let Some(registry) = PROMETHEUS_REGISTRY.get() else {
        if output.is_empty() {
            return "# Metrics registry not initialized\n".to_string();
        }
        return output;
    };

    let mut buffer = Vec::new();
    if let Err(e) = TextEncoder::new().encode(&registry.gather(), &mut buffer) {
        tracing::error!(error = %e, "Failed to encode metrics");
        return output;
    }

    output.push_str(&String::from_utf8_lossy(&buffer));
    output
}

pub fn record_analysis_outcome(outcome: &str) {
    if let Some(counter) = ANALYSIS_REQUESTS_TOTAL.get() {
        counter.with_label_values(&[outcome]).inc();
    }
}

pub fn record_generation(provider: &str, status: &str, duration: Duration) {
    if let Some(histogram) = GENERATION_DURATION_SECONDS.get() {
        histogram
            .with_label_values(&[provider, status])
            .observe(duration.as_secs_f64());
    }
}

pub fn record_email(provider: &str, status: &str) {
    if let Some(counter) = EMAILS_TOTAL.get() {
        counter.with_label_values(&[provider, status]).inc();
    }
}

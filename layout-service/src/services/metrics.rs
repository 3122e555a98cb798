//! Prometheus metrics for layout-service.

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::OnceLock;

/// Registry plus every collector registered in it, published together.
struct LayoutMetrics {
    registry: Registry,
    requests_total: IntCounterVec,
    upstream_duration_seconds: HistogramVec,
    tokens_total: IntCounterVec,
}

static METRICS: OnceLock<LayoutMetrics> = OnceLock::new();

/// Initialize all metrics. Later calls are no-ops.
pub fn init_metrics() -> Result<(), prometheus::Error> {
    if METRICS.get().is_some() {
        return Ok(());
    }

    let registry = Registry::new();

    // outcome: success, upstream_error
    let requests = IntCounterVec::new(
        Opts::new("layout_requests_total", "Total layout relay requests"),
        &["outcome"],
    )?;

    let upstream_duration = HistogramVec::new(
        HistogramOpts::new(
            "layout_upstream_duration_seconds",
            "Generation API latency in seconds",
        )
        .buckets(vec![0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0, 60.0, 120.0]),
        &["model"],
    )?;

    let tokens = IntCounterVec::new(
        Opts::new("layout_tokens_total", "Total tokens reported by the generation API"),
        &["model", "type"], // type: input, output
    )?;

    registry.register(Box::new(requests.clone()))?;
    registry.register(Box::new(upstream_duration.clone()))?;
    registry.register(Box::new(tokens.clone()))?;

    if METRICS
        .set(LayoutMetrics {
            registry,
            requests_total: requests,
            upstream_duration_seconds: upstream_duration,
            tokens_total: tokens,
        })
        .is_ok()
    {
        tracing::info!("Prometheus metrics initialized");
    }
    Ok(())
}

/// Get metrics in Prometheus text format.
pub fn get_metrics() -> String {
    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();

    let registry = match METRICS.get() {
        Some(m) => &m.registry,
        None => {
            tracing::error!("Metrics registry not initialized");
            return "# Metrics registry not initialized\n".to_string();
        }
    };

    if let Err(e) = encoder.encode(&registry.gather(), &mut buffer) {
        tracing::error!(error = %e, "Failed to encode metrics");
        return format!("# Failed to encode metrics: {}\n", e);
    }

    String::from_utf8(buffer).unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to convert metrics to UTF-8");
        format!("# Failed to convert metrics to UTF-8: {}\n", e)
    })
}

/// Record the outcome of one relay call.
pub fn record_request(outcome: &str) {
    if let Some(m) = METRICS.get() {
        m.requests_total.with_label_values(&[outcome]).inc();
    }
}

/// Record generation API latency.
pub fn record_upstream_latency(model: &str, duration_secs: f64) {
    if let Some(m) = METRICS.get() {
        m.upstream_duration_seconds
            .with_label_values(&[model])
            .observe(duration_secs);
    }
}

/// Record token usage when the backend reports it.
pub fn record_tokens(model: &str, input_tokens: Option<i32>, output_tokens: Option<i32>) {
    if let Some(m) = METRICS.get() {
        let counter = &m.tokens_total;
        if let Some(input) = input_tokens {
            counter
                .with_label_values(&[model, "input"])
                .inc_by(input.max(0) as u64);
        }
        if let Some(output) = output_tokens {
            counter
                .with_label_values(&[model, "output"])
                .inc_by(output.max(0) as u64);
        }
    }
}

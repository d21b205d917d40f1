use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::OnceLock;
use std::time::Duration;

struct ApiMetrics {
    registry: Registry,
    requests_total: IntCounterVec,
    request_duration_seconds: HistogramVec,
}

impl ApiMetrics {
    fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();

        let requests_total = IntCounterVec::new(
            Opts::new(
                "security_api_requests_total",
                "Total number of backend calls made by the dashboard",
            ),
            &["endpoint", "outcome"],
        )?;

        let request_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "security_api_request_duration_seconds",
                "Backend call duration in seconds",
            ),
            &["endpoint"],
        )?;

        registry.register(Box::new(requests_total.clone()))?;
        registry.register(Box::new(request_duration_seconds.clone()))?;

        Ok(Self {
            registry,
            requests_total,
            request_duration_seconds,
        })
    }
}

static METRICS: OnceLock<ApiMetrics> = OnceLock::new();

/// Create the registry. Safe to call more than once.
pub fn init_metrics() -> prometheus::Result<()> {
    if METRICS.get().is_none() {
        let _ = METRICS.set(ApiMetrics::new()?);
    }
    Ok(())
}

/// Record one backend call. No-op until [`init_metrics`] has run.
pub fn record_api_call(endpoint: &str, outcome: &str, elapsed: Duration) {
    if let Some(metrics) = METRICS.get() {
        metrics
            .requests_total
            .with_label_values(&[endpoint, outcome])
            .inc();
        metrics
            .request_duration_seconds
            .with_label_values(&[endpoint])
            .observe(elapsed.as_secs_f64());
    }
}

/// Prometheus text exposition of the dashboard's metrics.
pub fn get_metrics() -> anyhow::Result<String> {
    let metrics = METRICS
        .get()
        .ok_or_else(|| anyhow::anyhow!("metrics registry not initialized"))?;

    let mut buffer = Vec::new();
    TextEncoder::new().encode(&metrics.registry.gather(), &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

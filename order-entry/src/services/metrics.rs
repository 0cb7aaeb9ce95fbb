use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::OnceLock;

pub struct Metrics {
    registry: Registry,
    pub http_requests_total: IntCounterVec,
    pub http_request_duration_seconds: HistogramVec,
    pub erp_submissions_total: IntCounterVec,
}

impl Metrics {
    fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let http_requests_total = IntCounterVec::new(
            Opts::new("http_requests_total", "Total number of HTTP requests"),
            &["method", "path", "status"],
        )?;

        let http_request_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "http_request_duration_seconds",
                "HTTP request duration in seconds",
            ),
            &["method", "path", "status"],
        )?;

        let erp_submissions_total = IntCounterVec::new(
            Opts::new(
                "erp_submissions_total",
                "Orders and customers posted to the ERP API",
            ),
            &["kind", "outcome"],
        )?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(erp_submissions_total.clone()))?;

        Ok(Self {
            registry,
            http_requests_total,
            http_request_duration_seconds,
            erp_submissions_total,
        })
    }
}

static METRICS: OnceLock<Metrics> = OnceLock::new();

/// Create the registry once. Later calls are no-ops.
pub fn init_metrics() -> Result<(), prometheus::Error> {
    if METRICS.get().is_none() {
        let _ = METRICS.set(Metrics::new()?);
    }
    Ok(())
}

/// `None` until [`init_metrics`] ran; recording is skipped in that case.
pub fn metrics() -> Option<&'static Metrics> {
    METRICS.get()
}

pub fn record_submission(kind: &str, outcome: &str) {
    if let Some(metrics) = metrics() {
        metrics
            .erp_submissions_total
            .with_label_values(&[kind, outcome])
            .inc();
    }
}

pub fn get_metrics() -> String {
    let Some(metrics) = metrics() else {
        return String::new();
    };

    let mut buffer = Vec::new();
    if let Err(e) = TextEncoder::new().encode(&metrics.registry.gather(), &mut buffer) {
        tracing::error!(error = %e, "Failed to encode metrics");
        return String::new();
    }
    String::from_utf8_lossy(&buffer).into_owned()
}

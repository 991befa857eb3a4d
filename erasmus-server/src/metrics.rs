/// Prometheus metrics for the short-link service
///
/// Handlers record every request here; the registry is exposed at
/// `/metrics` in Prometheus text format.

use lazy_static::lazy_static;
use prometheus::{
    histogram_opts, opts, Encoder, HistogramVec, IntCounterVec, IntGauge, Registry, TextEncoder,
};
use std::sync::Once;
use std::time::Instant;

lazy_static! {
    /// Global Prometheus registry
    pub static ref REGISTRY: Registry = Registry::new();

    /// Total number of API requests by endpoint and HTTP status
    ///
    /// Labels:
    /// - endpoint: create, resolve, redirect
    /// - status: numeric HTTP status
    pub static ref REQUESTS_TOTAL: IntCounterVec = IntCounterVec::new(
        opts!(
            "erasmus_requests_total",
            "Total number of short-link API requests"
        ),
        &["endpoint", "status"]
    )
    .expect("valid requests_total metric");

    /// Request duration in seconds
    ///
    /// Buckets: 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0 seconds
    pub static ref REQUEST_DURATION_SECONDS: HistogramVec = HistogramVec::new(
        histogram_opts!(
            "erasmus_request_duration_seconds",
            "Short-link request duration in seconds",
            vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0]
        ),
        &["endpoint"]
    )
    .expect("valid request_duration metric");

    /// Number of records in the url table after the last write
    pub static ref STORED_RECORDS: IntGauge = IntGauge::with_opts(opts!(
        "erasmus_stored_records",
        "Number of short links in the url table"
    ))
    .expect("valid stored_records metric");
}

static REGISTER: Once = Once::new();

/// Register all metrics with the global registry. Safe to call repeatedly.
pub fn register_metrics() {
    REGISTER.call_once(|| {
        let collectors: Vec<Box<dyn prometheus::core::Collector>> = vec![
            Box::new(REQUESTS_TOTAL.clone()),
            Box::new(REQUEST_DURATION_SECONDS.clone()),
            Box::new(STORED_RECORDS.clone()),
        ];
        for collector in collectors {
            if let Err(e) = REGISTRY.register(collector) {
                tracing::error!("Failed to register metric: {}", e);
            }
        }
    });
}

/// Encode metrics in Prometheus text format
pub fn encode_metrics() -> Result<String, Box<dyn std::error::Error>> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = vec![];
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

/// Times one request and records its outcome
pub struct RequestTimer {
    endpoint: &'static str,
    started: Instant,
}

impl RequestTimer {
    pub fn start(endpoint: &'static str) -> Self {
        Self {
            endpoint,
            started: Instant::now(),
        }
    }

    pub fn finish(self, status: u16) {
        let status = status.to_string();
        REQUESTS_TOTAL
            .with_label_values(&[self.endpoint, status.as_str()])
            .inc();
        REQUEST_DURATION_SECONDS
            .with_label_values(&[self.endpoint])
            .observe(self.started.elapsed().as_secs_f64());
    }
}

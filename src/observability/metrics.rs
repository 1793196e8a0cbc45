//! Metrics collection and exposition.
//!
//! # Metrics
//! - `perf_reports_total` (counter): timing records by outcome (sent, failed, skipped)
//! - `perf_request_duration_ms` (histogram): handler latency by normalized route
//!
//! # Design Decisions
//! - Recording without an installed recorder is a no-op
//! - Labels use the normalized route, never the raw path

use std::net::SocketAddr;
use metrics_exporter_prometheus::PrometheusBuilder;

/// What happened to a request's timing record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportOutcome {
    Sent,
    Failed,
    Skipped,
}

impl ReportOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportOutcome::Sent => "sent",
            ReportOutcome::Failed => "failed",
            ReportOutcome::Skipped => "skipped",
        }
    }
}

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_report(outcome: ReportOutcome) {
    metrics::counter!("perf_reports_total", "outcome" => outcome.as_str()).increment(1);
}

pub fn record_request_duration(normalized_uri: &str, elapsed_ms: u64) {
    metrics::histogram!("perf_request_duration_ms", "route" => normalized_uri.to_string())
        .record(elapsed_ms as f64);
}

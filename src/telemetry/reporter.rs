//! Telemetry delivery.
//!
//! # Responsibilities
//! - Encode one timing record as the ingest payload
//! - POST it to the ingestion endpoint with the public API key
//! - Swallow every delivery failure after logging it
//!
//! # Design Decisions
//! - Exactly one attempt per record; no retry, no batching
//! - The ingest response body is never read
//! - Every send is bounded by the configured timeout
//! - Detached dispatch spawns a Tokio task per record

use std::sync::Arc;
use std::time::Duration;
use reqwest::header::CONTENT_TYPE;
use thiserror::Error;

use crate::config::{Dispatch, ReporterConfig};
use crate::observability::metrics::{self, ReportOutcome};
use crate::telemetry::record::TimingRecord;

/// Header carrying the public API key.
pub const API_KEY_HEADER: &str = "X-Perf-Public-API-Key";

/// Reasons a single delivery did not succeed.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to encode timing record: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Ingest request timed out after {0} ms")]
    Timeout(u64),

    #[error("Ingest transport error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Ingest endpoint returned status {0}")]
    Status(u16),
}

#[derive(Debug)]
struct ReporterInner {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    debug: bool,
    dispatch: Dispatch,
    timeout: Duration,
}

/// Best-effort sender of timing records. Cheap to clone.
#[derive(Debug, Clone)]
pub struct TelemetryReporter {
    inner: Arc<ReporterInner>,
}

impl TelemetryReporter {
    /// Create a reporter from its configuration.
    pub fn new(config: ReporterConfig) -> Self {
        Self {
            inner: Arc::new(ReporterInner {
                client: reqwest::Client::new(),
                endpoint: config.endpoint,
                api_key: config.api_key,
                debug: config.debug,
                dispatch: config.dispatch,
                timeout: Duration::from_millis(config.timeout_ms),
            }),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.inner.endpoint
    }

    pub fn dispatch(&self) -> Dispatch {
        self.inner.dispatch
    }

    pub fn is_debug(&self) -> bool {
        self.inner.debug
    }

    /// Make one delivery attempt and report how it went.
    pub async fn send(&self, record: &TimingRecord) -> Result<(), ReportError> {
        let payload = record.to_payload()?;

        if self.inner.debug {
            tracing::info!(endpoint = %self.inner.endpoint, payload = %payload, "Sending timing record");
        }

        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .header(API_KEY_HEADER, &self.inner.api_key)
            .timeout(self.inner.timeout)
            .body(payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ReportError::Timeout(self.inner.timeout.as_millis() as u64)
                } else {
                    ReportError::Transport(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ReportError::Status(status.as_u16()));
        }
        Ok(())
    }

    /// Hand a record off for delivery. Never fails.
    ///
    /// Inline dispatch returns once the attempt finished; detached dispatch
    /// returns immediately.
    pub async fn report(&self, record: TimingRecord) {
        match self.inner.dispatch {
            Dispatch::Inline => self.deliver(record).await,
            Dispatch::Detached => {
                let reporter = self.clone();
                tokio::spawn(async move {
                    reporter.deliver(record).await;
                });
            }
        }
    }

    async fn deliver(&self, record: TimingRecord) {
        match self.send(&record).await {
            Ok(()) => {
                metrics::record_report(ReportOutcome::Sent);
                tracing::debug!(
                    normalized_uri = %record.normalized_uri,
                    elapsed_ms = record.time_in_millis,
                    "Timing record delivered"
                );
            }
            Err(e) => {
                metrics::record_report(ReportOutcome::Failed);
                if self.inner.debug {
                    tracing::warn!(error = %e, normalized_uri = %record.normalized_uri, "Timing record dropped");
                } else {
                    tracing::debug!(error = %e, normalized_uri = %record.normalized_uri, "Timing record dropped");
                }
            }
        }
    }
}

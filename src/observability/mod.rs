//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! middleware + reporter produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (report outcomes, latency histograms)
//!
//! Consumers:
//!     → stdout (fmt layer)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```

pub mod logging;
pub mod metrics;

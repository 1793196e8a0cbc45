//! Telemetry subsystem.
//!
//! # Data Flow
//! ```text
//! timer.rs (start → stop → TimerSpan)
//!     → record.rs (TimingRecord, one-element JSON array)
//!     → reporter.rs (POST to ingest, inline or detached)
//! ```
//!
//! # Design Decisions
//! - Records are immutable values, one per reportable request
//! - Delivery is best-effort; failures never reach the caller

pub mod record;
pub mod reporter;
pub mod timer;

pub use record::TimingRecord;
pub use reporter::{ReportError, TelemetryReporter, API_KEY_HEADER};
pub use timer::{RequestTimer, RunningTimer, TimerSpan};

//! HTTP integration subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request
//!     → middleware.rs (start timer, capture RequestContext)
//!     → request.rs (path, method, full URL, headers)
//!     → client_addr.rs (X-Forwarded-For or peer IP)
//!     → wrapped application
//!     → middleware.rs (stop timer, normalize, report)
//!     → response returned unchanged
//! ```

pub mod client_addr;
pub mod middleware;
pub mod request;
pub mod server;

pub use client_addr::resolve_client_addr;
pub use middleware::{PerfLayer, PerfService};
pub use request::{RequestContext, RequestView};
pub use server::PerfServer;

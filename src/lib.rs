//! Request timing middleware that reports normalized route latency.

pub mod config;
pub mod http;
pub mod observability;
pub mod routing;
pub mod telemetry;

pub use config::schema::PerfConfig;
pub use http::{PerfLayer, PerfServer, PerfService};
pub use routing::{normalize_path, Recognition, RouteMatch, RouteResolver, RouteTable};
pub use telemetry::{TelemetryReporter, TimingRecord};

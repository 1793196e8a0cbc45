//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize, PERF_API_KEY override)
//!     → validation.rs (semantic checks)
//!     → PerfConfig (validated, immutable)
//!     → split into reporter / route table / server settings
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{apply_env_overrides, load_config, parse_config, ConfigError};
pub use schema::{
    ClientAddrConfig, Dispatch, ListenerConfig, ObservabilityConfig, PerfConfig, ReporterConfig,
    RouteConfig, DEFAULT_ENDPOINT,
};
pub use validation::ValidationError;

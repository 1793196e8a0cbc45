//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Request (path, method)
//!     → resolver.rs (RouteResolver contract)
//!     → table.rs (compiled patterns, first match wins)
//!     → Recognition: Matched(RouteMatch) | NotMatched
//!     → normalizer.rs (path + RouteMatch → "/articles/:id")
//!
//! Route Compilation (at startup):
//!     RouteConfig[]
//!     → Parse patterns into static/param segments
//!     → Freeze as immutable RouteTable
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in hot path (segment comparison only)
//! - Deterministic: same input always yields the same template

pub mod normalizer;
pub mod resolver;
pub mod table;

pub use normalizer::normalize_path;
pub use resolver::{Recognition, RouteMatch, RouteResolver};
pub use table::{Route, RoutePatternError, RouteTable};

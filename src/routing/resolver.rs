//! Route recognition contract.
//!
//! # Responsibilities
//! - Define the capability the middleware calls into to recognize a path
//! - Carry the ordered parameter mapping a routing table produced
//!
//! # Design Decisions
//! - "No route" is an ordinary outcome, returned as `Recognition::NotMatched`
//! - Parameter order is preserved exactly as the resolver produced it

use axum::http::Method;

/// Parameter naming the handler's controller. Never a path segment.
pub const CONTROLLER_PARAM: &str = "controller";
/// Parameter naming the handler's action. Never a path segment.
pub const ACTION_PARAM: &str = "action";
/// Parameter holding the file-extension suffix of the final segment.
pub const FORMAT_PARAM: &str = "format";

/// Ordered mapping from parameter name to matched value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteMatch {
    params: Vec<(String, String)>,
}

impl RouteMatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter, keeping insertion order.
    ///
    /// A name that is already present has its value replaced in place.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.params.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.params.push((name, value)),
        }
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// All parameters in resolver order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Parameters that can stand for a path segment (everything but
    /// `controller` and `action`).
    pub fn path_params(&self) -> impl Iterator<Item = (&str, &str)> {
        self.iter()
            .filter(|(name, _)| *name != CONTROLLER_PARAM && *name != ACTION_PARAM)
    }

    /// Extension captured by the route, or `""` when none.
    pub fn format(&self) -> &str {
        self.get(FORMAT_PARAM).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

impl<N, V> FromIterator<(N, V)> for RouteMatch
where
    N: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut route = RouteMatch::new();
        for (name, value) in iter {
            route.insert(name, value);
        }
        route
    }
}

/// Outcome of asking a routing table about a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recognition {
    Matched(RouteMatch),
    NotMatched,
}

impl Recognition {
    pub fn route(&self) -> Option<&RouteMatch> {
        match self {
            Recognition::Matched(route) => Some(route),
            Recognition::NotMatched => None,
        }
    }

    pub fn is_matched(&self) -> bool {
        matches!(self, Recognition::Matched(_))
    }
}

impl From<Option<RouteMatch>> for Recognition {
    fn from(route: Option<RouteMatch>) -> Self {
        route.map_or(Recognition::NotMatched, Recognition::Matched)
    }
}

/// Recognizes a concrete request path against a routing table.
pub trait RouteResolver: Send + Sync + std::fmt::Debug {
    /// Returns the parameters the table matched for `path` under `method`.
    fn recognize_path(&self, path: &str, method: &Method) -> Recognition;
}

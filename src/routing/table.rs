//! Pattern-based route table.
//!
//! # Responsibilities
//! - Compile route patterns such as `/articles/:id(.:format)`
//! - Recognize a path + method and produce the ordered parameter mapping
//!
//! # Design Decisions
//! - Routes checked in declaration order; first match wins
//! - Static segments are case-sensitive, exact
//! - A `:name` segment captures exactly one non-empty path segment
//! - `(.:format)` is only allowed as the pattern suffix
//! - HEAD requests are recognized by GET routes
//! - Trailing slashes on the request path are ignored

use axum::http::Method;
use thiserror::Error;

use crate::config::RouteConfig;
use super::resolver::{
    Recognition, RouteMatch, RouteResolver, ACTION_PARAM, CONTROLLER_PARAM, FORMAT_PARAM,
};

const FORMAT_SUFFIX: &str = "(.:format)";

/// Reasons a route pattern cannot be compiled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutePatternError {
    #[error("Route pattern '{0}' must start with '/'")]
    MissingLeadingSlash(String),

    #[error("Route pattern '{0}' contains an empty segment")]
    EmptySegment(String),

    #[error("Route pattern '{pattern}' has invalid parameter name '{name}'")]
    InvalidParam { pattern: String, name: String },

    #[error("Route pattern '{pattern}' repeats parameter '{name}'")]
    DuplicateParam { pattern: String, name: String },

    #[error("Invalid HTTP method '{0}'")]
    InvalidMethod(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Static(String),
    Param(String),
}

/// A single compiled route.
#[derive(Debug, Clone)]
pub struct Route {
    method: Option<Method>,
    segments: Vec<Segment>,
    allows_format: bool,
    controller: String,
    action: String,
}

impl Route {
    /// Compile `pattern` into a route. `method: None` accepts any method.
    pub fn new(
        method: Option<Method>,
        pattern: &str,
        controller: impl Into<String>,
        action: impl Into<String>,
    ) -> Result<Self, RoutePatternError> {
        let (body, allows_format) = match pattern.strip_suffix(FORMAT_SUFFIX) {
            Some(body) => (body, true),
            None => (pattern, false),
        };

        let rest = body
            .strip_prefix('/')
            .ok_or_else(|| RoutePatternError::MissingLeadingSlash(pattern.to_string()))?;
        let rest = rest.strip_suffix('/').unwrap_or(rest);

        let mut segments = Vec::new();
        if !rest.is_empty() {
            for part in rest.split('/') {
                segments.push(parse_segment(pattern, part, &segments)?);
            }
        }

        Ok(Self {
            method,
            segments,
            allows_format,
            controller: controller.into(),
            action: action.into(),
        })
    }

    /// Build a route from its configuration entry.
    pub fn from_config(config: &RouteConfig) -> Result<Self, RoutePatternError> {
        let method = match config.method.as_deref() {
            None | Some("*") | Some("ANY") | Some("any") => None,
            Some(m) => Some(
                Method::from_bytes(m.to_ascii_uppercase().as_bytes())
                    .map_err(|_| RoutePatternError::InvalidMethod(m.to_string()))?,
            ),
        };
        Self::new(method, &config.pattern, &config.controller, &config.action)
    }

    fn accepts_method(&self, method: &Method) -> bool {
        match &self.method {
            None => true,
            Some(expected) => {
                expected == method || (*method == Method::HEAD && *expected == Method::GET)
            }
        }
    }

    /// Match `path` against this route.
    pub fn recognize(&self, path: &str, method: &Method) -> Option<RouteMatch> {
        if !self.accepts_method(method) {
            return None;
        }

        let trimmed = path.trim_start_matches('/').trim_end_matches('/');
        let parts: Vec<&str> = if trimmed.is_empty() {
            Vec::new()
        } else {
            trimmed.split('/').collect()
        };

        if self.allows_format {
            if let Some((last, rest)) = parts.split_last() {
                if let Some((stem, ext)) = last.rsplit_once('.') {
                    if !stem.is_empty() && !ext.is_empty() {
                        let mut with_stem = rest.to_vec();
                        with_stem.push(stem);
                        if let Some(route) = self.capture(&with_stem, Some(ext)) {
                            return Some(route);
                        }
                    }
                }
            }
        }

        self.capture(&parts, None)
    }

    fn capture(&self, parts: &[&str], format: Option<&str>) -> Option<RouteMatch> {
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut route = RouteMatch::new()
            .with(CONTROLLER_PARAM, self.controller.as_str())
            .with(ACTION_PARAM, self.action.as_str());

        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Static(text) if text.as_str() == *part => {}
                Segment::Static(_) => return None,
                Segment::Param(_) if part.is_empty() => return None,
                Segment::Param(name) => route.insert(name.as_str(), *part),
            }
        }

        if let Some(ext) = format {
            route.insert(FORMAT_PARAM, ext);
        }
        Some(route)
    }
}

fn parse_segment(
    pattern: &str,
    part: &str,
    seen: &[Segment],
) -> Result<Segment, RoutePatternError> {
    if part.is_empty() {
        return Err(RoutePatternError::EmptySegment(pattern.to_string()));
    }

    let Some(name) = part.strip_prefix(':') else {
        return Ok(Segment::Static(part.to_string()));
    };

    let valid = !name.is_empty()
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        && ![CONTROLLER_PARAM, ACTION_PARAM, FORMAT_PARAM].contains(&name);
    if !valid {
        return Err(RoutePatternError::InvalidParam {
            pattern: pattern.to_string(),
            name: name.to_string(),
        });
    }

    if seen.iter().any(|s| matches!(s, Segment::Param(n) if n == name)) {
        return Err(RoutePatternError::DuplicateParam {
            pattern: pattern.to_string(),
            name: name.to_string(),
        });
    }

    Ok(Segment::Param(name.to_string()))
}

/// Ordered set of routes acting as a [`RouteResolver`].
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile every configured route, failing on the first bad pattern.
    pub fn from_config(routes: &[RouteConfig]) -> Result<Self, RoutePatternError> {
        let routes = routes
            .iter()
            .map(Route::from_config)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { routes })
    }

    pub fn push(&mut self, route: Route) {
        self.routes.push(route);
    }

    /// Builder-style helper: compile and append a route.
    pub fn route(
        mut self,
        method: Option<Method>,
        pattern: &str,
        controller: &str,
        action: &str,
    ) -> Result<Self, RoutePatternError> {
        self.push(Route::new(method, pattern, controller, action)?);
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl RouteResolver for RouteTable {
    fn recognize_path(&self, path: &str, method: &Method) -> Recognition {
        self.routes
            .iter()
            .find_map(|route| route.recognize(path, method))
            .into()
    }
}

//! Path normalization.
//!
//! Turns a concrete path into the route template it was served by, so that
//! `/users/42` and `/users/7` aggregate under `/users/:id`.
//!
//! # Algorithm
//! ```text
//! "/users/42.json" + {id: "42", format: "json"}
//!     → split on '/'      ["", "users", "42.json"]
//!     → rewrite segments  ["", "users", ":id"]
//!     → join on '/'       "/users/:id"
//! ```
//!
//! # Design Decisions
//! - Pure function, no allocation beyond the output
//! - Every segment is compared against its original text; when several
//!   parameters match, the last one in resolver order wins
//! - Parameters with empty values never match, so empty segments survive

use super::resolver::{Recognition, RouteMatch};

/// Normalize `path` using the outcome of route recognition.
///
/// Returns `None` when the path was not recognized, meaning the request
/// should not be reported.
pub fn normalize_path(path: &str, recognition: &Recognition) -> Option<String> {
    recognition.route().map(|route| normalize_matched(path, route))
}

/// Normalize `path` against a route that is known to have matched it.
fn normalize_matched(path: &str, route: &RouteMatch) -> String {
    let format = route.format();

    path.split('/')
        .map(|segment| {
            let mut normalized: Option<&str> = None;
            for (name, value) in route.path_params() {
                if value.is_empty() {
                    continue;
                }
                if segment == value || has_format_suffix(segment, value, format) {
                    normalized = Some(name);
                }
            }
            match normalized {
                Some(name) => format!(":{name}"),
                None => segment.to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// True when `segment` is exactly `value.format`.
fn has_format_suffix(segment: &str, value: &str, format: &str) -> bool {
    !format.is_empty()
        && segment
            .strip_prefix(value)
            .and_then(|rest| rest.strip_prefix('.'))
            == Some(format)
}

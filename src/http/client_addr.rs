//! Client address resolution.
//!
//! `X-Forwarded-For` is taken verbatim, including comma-separated chains,
//! whenever it is present and non-empty. Repeated header lines are joined
//! with `", "` in arrival order. Nothing validates that the header
//! came from a trusted proxy; set `client_addr.trust_forwarded_for = false`
//! when the service is reachable directly.

use crate::http::request::{RequestView, X_FORWARDED_FOR};

/// Address reported for `request`.
///
/// Falls back to the peer IP, then to an empty string when the transport
/// did not record a peer.
pub fn resolve_client_addr<R: RequestView + ?Sized>(request: &R, trust_forwarded_for: bool) -> String {
    if trust_forwarded_for {
        let forwarded: Vec<&str> = request
            .header_all(X_FORWARDED_FOR)
            .into_iter()
            .filter(|v| !v.is_empty())
            .collect();
        if !forwarded.is_empty() {
            return forwarded.join(", ");
        }
    }

    request
        .peer_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_default()
}

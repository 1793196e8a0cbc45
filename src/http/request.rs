//! Narrow view over an incoming request.
//!
//! # Responsibilities
//! - Expose path, method, full URL, peer address and headers
//! - Snapshot what the reporter needs before the handler consumes the request
//!
//! # Design Decisions
//! - Any framework's request type can join by implementing `RequestView`
//! - The peer address comes from axum's `ConnectInfo<SocketAddr>` extension
//! - Full URL honours `X-Forwarded-Proto`, `X-Forwarded-Host` and `Host`

use axum::extract::ConnectInfo;
use axum::http::{header, HeaderMap, Method, Request, Uri};
use std::net::SocketAddr;

use crate::http::client_addr::resolve_client_addr;

pub const X_FORWARDED_FOR: &str = "x-forwarded-for";
pub const X_FORWARDED_PROTO: &str = "x-forwarded-proto";
pub const X_FORWARDED_HOST: &str = "x-forwarded-host";

/// What the timing pipeline reads from a request.
pub trait RequestView {
    fn path(&self) -> &str;
    fn method(&self) -> &Method;
    /// Absolute URL including the query string.
    fn url(&self) -> String;
    fn peer_addr(&self) -> Option<SocketAddr>;
    fn header(&self, name: &str) -> Option<&str>;
    /// Every value of a repeated header, in arrival order.
    fn header_all(&self, name: &str) -> Vec<&str>;
}

impl<B> RequestView for Request<B> {
    fn path(&self) -> &str {
        self.uri().path()
    }

    fn method(&self) -> &Method {
        Request::method(self)
    }

    fn url(&self) -> String {
        full_url(self.uri(), self.headers())
    }

    fn peer_addr(&self) -> Option<SocketAddr> {
        self.extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr)
    }

    fn header(&self, name: &str) -> Option<&str> {
        self.headers().get(name).and_then(|v| v.to_str().ok())
    }

    fn header_all(&self, name: &str) -> Vec<&str> {
        self.headers()
            .get_all(name)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect()
    }
}

/// Rebuild the absolute URL a client asked for.
pub fn full_url(uri: &Uri, headers: &HeaderMap) -> String {
    if uri.scheme().is_some() && uri.authority().is_some() {
        return uri.to_string();
    }

    let path_and_query = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");

    let host = first_forwarded(headers, X_FORWARDED_HOST).or_else(|| {
        headers
            .get(header::HOST)
            .and_then(|v| v.to_str().ok())
            .filter(|h| !h.is_empty())
    });

    let Some(host) = host else {
        return path_and_query.to_string();
    };

    let scheme = first_forwarded(headers, X_FORWARDED_PROTO).unwrap_or("http");

    format!("{scheme}://{host}{path_and_query}")
}

/// First comma-separated entry of a proxy header, trimmed.
fn first_forwarded<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Request-scoped snapshot taken when the request arrives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub path: String,
    pub method: Method,
    pub url: String,
    pub client_ip: String,
}

impl RequestContext {
    pub fn capture<R: RequestView + ?Sized>(request: &R, trust_forwarded_for: bool) -> Self {
        Self {
            path: request.path().to_string(),
            method: request.method().clone(),
            url: request.url(),
            client_ip: resolve_client_addr(request, trust_forwarded_for),
        }
    }
}

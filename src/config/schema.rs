//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the timing
//! middleware and its sample server. All types derive Serde traits for
//! deserialization from config files.

use serde::{Deserialize, Serialize};

/// Default ingestion endpoint for timing records.
pub const DEFAULT_ENDPOINT: &str = "https://data.perf.sh/ingest";

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct PerfConfig {
    /// Listener configuration for the sample server.
    pub listener: ListenerConfig,

    /// Telemetry delivery settings.
    pub reporter: ReporterConfig,

    /// Client address resolution.
    pub client_addr: ClientAddrConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Route table used to recognize and normalize paths.
    pub routes: Vec<RouteConfig>,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Request timeout for the wrapped application, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// How a finished timing record reaches the reporter.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Dispatch {
    /// Send before the response is handed back (adds the round-trip to latency).
    #[default]
    Inline,
    /// Hand the record to a background task and return immediately.
    Detached,
}

/// Telemetry reporter configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ReporterConfig {
    /// Public API key sent as `X-Perf-Public-API-Key`.
    pub api_key: String,

    /// Ingestion URL.
    pub endpoint: String,

    /// Log every outgoing payload.
    pub debug: bool,

    /// Inline or detached delivery.
    pub dispatch: Dispatch,

    /// Upper bound on a single delivery, in milliseconds.
    pub timeout_ms: u64,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            debug: false,
            dispatch: Dispatch::Inline,
            timeout_ms: 2000,
        }
    }
}

/// Client address resolution configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ClientAddrConfig {
    /// Take `X-Forwarded-For` verbatim when present.
    /// Disable when the service is not behind a trusted proxy.
    pub trust_forwarded_for: bool,
}

impl Default for ClientAddrConfig {
    fn default() -> Self {
        Self {
            trust_forwarded_for: true,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// A route pattern recognized by the route table.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteConfig {
    /// HTTP method; absent or "*" matches any method.
    #[serde(default)]
    pub method: Option<String>,

    /// Pattern such as `/articles/:id(.:format)`.
    pub pattern: String,

    /// Handler group, reported as the `controller` parameter.
    #[serde(default)]
    pub controller: String,

    /// Handler name, reported as the `action` parameter.
    #[serde(default)]
    pub action: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PerfConfig::default();
        assert_eq!(config.reporter.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.reporter.dispatch, Dispatch::Inline);
        assert!(!config.reporter.debug);
        assert!(config.client_addr.trust_forwarded_for);
        assert!(config.routes.is_empty());
    }

    #[test]
    fn test_parse_minimal_toml() {
        let config: PerfConfig = toml::from_str(
            r#"
            [reporter]
            api_key = "pk_test"
            dispatch = "detached"

            [[routes]]
            method = "GET"
            pattern = "/articles/:id(.:format)"
            controller = "articles"
            action = "show"
            "#,
        )
        .unwrap();

        assert_eq!(config.reporter.api_key, "pk_test");
        assert_eq!(config.reporter.dispatch, Dispatch::Detached);
        assert_eq!(config.reporter.timeout_ms, 2000);
        assert_eq!(config.routes.len(), 1);
        assert_eq!(config.routes[0].method.as_deref(), Some("GET"));
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
    }
}

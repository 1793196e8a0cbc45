//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the ingestion endpoint is a usable http(s) URL
//! - Validate value ranges (timeouts > 0, bind address parses)
//! - Compile every route pattern once to surface bad patterns early
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: PerfConfig → Result<(), Vec<ValidationError>>
//! - An empty API key is allowed here; binaries warn about it

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::PerfConfig;
use crate::routing::table::{Route, RoutePatternError};

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("reporter.endpoint '{0}' is not a valid http(s) URL")]
    InvalidEndpoint(String),

    #[error("reporter.timeout_ms must be greater than zero")]
    ZeroReportTimeout,

    #[error("listener.bind_address '{0}' is not a socket address")]
    InvalidBindAddress(String),

    #[error("listener.request_timeout_secs must be greater than zero")]
    ZeroRequestTimeout,

    #[error("observability.metrics_address '{0}' is not a socket address")]
    InvalidMetricsAddress(String),

    #[error("routes[{index}]: {source}")]
    InvalidRoute {
        index: usize,
        source: RoutePatternError,
    },
}

/// Validate a parsed configuration, collecting every problem found.
pub fn validate_config(config: &PerfConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match url::Url::parse(&config.reporter.endpoint) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => {}
        _ => errors.push(ValidationError::InvalidEndpoint(
            config.reporter.endpoint.clone(),
        )),
    }

    if config.reporter.timeout_ms == 0 {
        errors.push(ValidationError::ZeroReportTimeout);
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.listener.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    for (index, route) in config.routes.iter().enumerate() {
        if let Err(source) = Route::from_config(route) {
            errors.push(ValidationError::InvalidRoute { index, source });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RouteConfig;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(validate_config(&PerfConfig::default()), Ok(()));
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = PerfConfig::default();
        config.reporter.endpoint = "ftp://data.perf.sh/ingest".into();
        config.reporter.timeout_ms = 0;
        config.listener.bind_address = "not-an-address".into();
        config.routes.push(RouteConfig {
            method: None,
            pattern: "no-slash".into(),
            controller: "a".into(),
            action: "b".into(),
        });

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&ValidationError::ZeroReportTimeout));
        assert!(matches!(
            errors.last(),
            Some(ValidationError::InvalidRoute { index: 0, .. })
        ));
    }

    #[test]
    fn test_metrics_address_only_checked_when_enabled() {
        let mut config = PerfConfig::default();
        config.observability.metrics_address = "nope".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        assert_eq!(
            validate_config(&config),
            Err(vec![ValidationError::InvalidMetricsAddress("nope".into())])
        );
    }
}

//! Request timing middleware.
//!
//! # Per-request flow
//! ```text
//! IDLE ──start()──▶ TIMING ──handler returns──▶ NORMALIZING
//!                     │                              │
//!               handler error                 matched │ not matched
//!                     │                              ▼         ▼
//!                     ▼                        REPORTING    SKIPPED
//!              error returned                        │         │
//!                                                    └──▶ DONE ◀┘
//! ```
//!
//! # Design Decisions
//! - The wrapped response is returned untouched in every branch
//! - Handler errors pass through and produce no record
//! - All per-request state lives in the future; the service holds only
//!   shared, immutable collaborators

use std::sync::Arc;
use std::task::{Context, Poll};
use axum::http::{Request, Response};
use futures_util::future::BoxFuture;
use tower::{Layer, Service};

use crate::config::{PerfConfig, ReporterConfig};
use crate::http::request::RequestContext;
use crate::observability::metrics::{self, ReportOutcome};
use crate::routing::{normalize_path, RoutePatternError, RouteResolver, RouteTable};
use crate::telemetry::{RequestTimer, TelemetryReporter, TimingRecord};

/// Layer that wraps a service in [`PerfService`].
#[derive(Debug, Clone)]
pub struct PerfLayer {
    resolver: Arc<dyn RouteResolver>,
    reporter: TelemetryReporter,
    trust_forwarded_for: bool,
}

impl PerfLayer {
    pub fn new(resolver: impl RouteResolver + 'static, reporter: TelemetryReporter) -> Self {
        Self {
            resolver: Arc::new(resolver),
            reporter,
            trust_forwarded_for: true,
        }
    }

    /// Report to the default endpoint with `api_key`, optionally logging
    /// every payload.
    pub fn with_api_key(
        resolver: impl RouteResolver + 'static,
        api_key: impl Into<String>,
        debug: bool,
    ) -> Self {
        let reporter = TelemetryReporter::new(ReporterConfig {
            api_key: api_key.into(),
            debug,
            ..ReporterConfig::default()
        });
        Self::new(resolver, reporter)
    }

    /// Build the route table and reporter described by `config`.
    pub fn from_config(config: &PerfConfig) -> Result<Self, RoutePatternError> {
        let table = RouteTable::from_config(&config.routes)?;
        let reporter = TelemetryReporter::new(config.reporter.clone());
        Ok(Self::new(table, reporter)
            .trust_forwarded_for(config.client_addr.trust_forwarded_for))
    }

    /// Whether `X-Forwarded-For` overrides the peer address.
    pub fn trust_forwarded_for(mut self, trust: bool) -> Self {
        self.trust_forwarded_for = trust;
        self
    }

    pub fn reporter(&self) -> &TelemetryReporter {
        &self.reporter
    }
}

impl<S> Layer<S> for PerfLayer {
    type Service = PerfService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        PerfService {
            inner,
            resolver: Arc::clone(&self.resolver),
            reporter: self.reporter.clone(),
            trust_forwarded_for: self.trust_forwarded_for,
        }
    }
}

/// Service that times the wrapped handler and reports the result.
#[derive(Debug, Clone)]
pub struct PerfService<S> {
    inner: S,
    resolver: Arc<dyn RouteResolver>,
    reporter: TelemetryReporter,
    trust_forwarded_for: bool,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for PerfService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: Send + 'static,
    ReqBody: Send + 'static,
    ResBody: Send + 'static,
{
    type Response = Response<ResBody>;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<ReqBody>) -> Self::Future {
        let timer = RequestTimer::start();
        let context = RequestContext::capture(&request, self.trust_forwarded_for);

        // Keep the instance that poll_ready drove to readiness.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let resolver = Arc::clone(&self.resolver);
        let reporter = self.reporter.clone();

        Box::pin(async move {
            let response = inner.call(request).await?;
            let span = timer.stop();

            let recognition = resolver.recognize_path(&context.path, &context.method);
            let Some(normalized_uri) = normalize_path(&context.path, &recognition) else {
                metrics::record_report(ReportOutcome::Skipped);
                tracing::debug!(
                    method = %context.method,
                    path = %context.path,
                    "No route recognized, timing not reported"
                );
                return Ok(response);
            };

            let elapsed_ms = span.elapsed_millis();
            metrics::record_request_duration(&normalized_uri, elapsed_ms);

            let record = TimingRecord {
                ip_addr: context.client_ip,
                request_method: context.method.to_string(),
                request_url: context.url,
                normalized_uri,
                status_code: response.status().as_u16(),
                time_in_millis: elapsed_ms,
            };
            reporter.report(record).await;

            Ok(response)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::{Recognition, RouteMatch};
    use axum::body::Body;
    use axum::http::{Method, StatusCode};
    use std::convert::Infallible;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tower::{service_fn, ServiceExt};

    #[derive(Debug, Default)]
    struct CountingResolver {
        calls: AtomicUsize,
    }

    impl RouteResolver for CountingResolver {
        fn recognize_path(&self, _path: &str, _method: &Method) -> Recognition {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Recognition::NotMatched
        }
    }

    #[derive(Debug)]
    struct Fixed(RouteMatch);

    impl RouteResolver for Fixed {
        fn recognize_path(&self, _path: &str, _method: &Method) -> Recognition {
            Recognition::Matched(self.0.clone())
        }
    }

    fn unreachable_reporter() -> TelemetryReporter {
        TelemetryReporter::new(ReporterConfig {
            endpoint: "http://127.0.0.1:9/ingest".into(),
            timeout_ms: 200,
            ..ReporterConfig::default()
        })
    }

    #[tokio::test]
    async fn test_response_passes_through_unchanged() {
        let layer = PerfLayer::new(Fixed(RouteMatch::new().with("id", "1")), unreachable_reporter());
        let svc = layer.layer(service_fn(|_req: Request<Body>| async {
            Ok::<_, Infallible>(
                Response::builder()
                    .status(StatusCode::CREATED)
                    .header("x-custom", "kept")
                    .body(Body::from("payload"))
                    .unwrap(),
            )
        }));

        let response = svc
            .oneshot(Request::builder().uri("/items/1").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers()["x-custom"], "kept");
        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        assert_eq!(&body[..], b"payload");
    }

    #[tokio::test]
    async fn test_handler_error_skips_recognition() {
        let resolver = Arc::new(CountingResolver::default());
        let layer = PerfLayer {
            resolver: resolver.clone(),
            reporter: unreachable_reporter(),
            trust_forwarded_for: true,
        };
        let svc = layer.layer(service_fn(|_req: Request<Body>| async {
            Err::<Response<Body>, _>("handler failed")
        }));

        let err = svc
            .oneshot(Request::builder().uri("/x").body(Body::empty()).unwrap())
            .await
            .unwrap_err();

        assert_eq!(err, "handler failed");
        assert_eq!(resolver.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unmatched_route_consults_resolver_once() {
        let resolver = Arc::new(CountingResolver::default());
        let layer = PerfLayer {
            resolver: resolver.clone(),
            reporter: unreachable_reporter(),
            trust_forwarded_for: true,
        };
        let svc = layer.layer(service_fn(|_req: Request<Body>| async {
            Ok::<_, Infallible>(Response::new(Body::empty()))
        }));

        let response = svc
            .oneshot(Request::builder().uri("/assets/logo.png").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(resolver.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_with_api_key_targets_default_endpoint() {
        let layer = PerfLayer::with_api_key(RouteTable::new(), "pk_live", true);
        assert_eq!(layer.reporter().endpoint(), crate::config::DEFAULT_ENDPOINT);
        assert!(layer.reporter().is_debug());
    }

    #[test]
    fn test_from_config_rejects_bad_route() {
        let mut config = PerfConfig::default();
        config.routes.push(crate::config::RouteConfig {
            method: None,
            pattern: "relative".into(),
            controller: String::new(),
            action: String::new(),
        });
        assert!(PerfLayer::from_config(&config).is_err());
    }
}

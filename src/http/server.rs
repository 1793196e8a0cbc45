//! Sample HTTP server.
//!
//! # Responsibilities
//! - Serve a stand-in application (echo fallback) behind the timing layer
//! - Wire up middleware (trace, timeout, timing)
//! - Bind server to listener with peer address capture
//! - Shut down gracefully on signal

use axum::{
    extract::Request,
    http::StatusCode,
    response::IntoResponse,
    Router,
};
use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::PerfConfig;
use crate::http::middleware::PerfLayer;
use crate::routing::RoutePatternError;

/// HTTP server hosting an application wrapped in [`PerfLayer`].
pub struct PerfServer {
    router: Router,
    config: PerfConfig,
}

impl PerfServer {
    /// Create a server for the sample application.
    pub fn new(config: PerfConfig) -> Result<Self, RoutePatternError> {
        Self::with_app(config, Router::new().fallback(echo_handler))
    }

    /// Wrap an arbitrary application.
    pub fn with_app(config: PerfConfig, app: Router) -> Result<Self, RoutePatternError> {
        let perf = PerfLayer::from_config(&config)?;
        let router = Self::build_router(&config, app, perf);
        Ok(Self { router, config })
    }

    /// Apply all middleware layers. The timing layer sits innermost so the
    /// measured time is the application's own.
    #[allow(deprecated)]
    fn build_router(config: &PerfConfig, app: Router, perf: PerfLayer) -> Router {
        app.layer(perf)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.listener.request_timeout_secs,
            )))
            .layer(TraceLayer::new_for_http())
    }

    /// Run until Ctrl+C.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        self.run_until(listener, shutdown_signal()).await
    }

    /// Run until `shutdown` resolves.
    pub async fn run_until<F>(self, listener: TcpListener, shutdown: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            routes = self.config.routes.len(),
            dispatch = ?self.config.reporter.dispatch,
            "HTTP server starting"
        );

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &PerfConfig {
        &self.config
    }

    /// The fully layered router, for driving without a socket.
    pub fn into_router(self) -> Router {
        self.router
    }
}

/// Stand-in application: echoes method and path.
async fn echo_handler(request: Request) -> impl IntoResponse {
    (
        StatusCode::OK,
        format!("{} {}\n", request.method(), request.uri().path()),
    )
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, timeout)
//! - Hold the injected dependencies handlers share
//! - Serve until the shutdown signal fires

use axum::{routing::get, Router};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{ContextMode, HomepageMode, ServiceConfig};
use crate::dice::{Delay, TokioSleep};
use crate::flags::{provider_from_config, FlagClient, FlagError};
use crate::http::homepage::{homepage, ROLL_PATH};
use crate::http::request::UuidRequestId;
use crate::http::rolldice::rolldice;
use crate::observability::tracing::make_request_span;
use crate::observability::RollMetrics;

/// Per-roll settings derived from configuration.
#[derive(Debug, Clone)]
pub struct RollSettings {
    pub flag_key: String,
    pub context_mode: ContextMode,
    pub targeting_key: Option<String>,
    pub slow_roll: Duration,
}

impl RollSettings {
    pub fn from_config(config: &ServiceConfig) -> Self {
        Self {
            flag_key: config.flags.key.clone(),
            context_mode: config.flags.context,
            targeting_key: config.flags.targeting_key.clone(),
            slow_roll: config.delay.slow_roll(),
        }
    }
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub flags: FlagClient,
    pub metrics: RollMetrics,
    pub delay: Arc<dyn Delay>,
    pub roll: Arc<RollSettings>,
    pub homepage: HomepageMode,
}

impl AppState {
    /// Assemble state from explicit dependencies. The delay defaults to a
    /// real tokio sleep.
    pub fn new(config: &ServiceConfig, flags: FlagClient, metrics: RollMetrics) -> Self {
        Self {
            flags,
            metrics,
            delay: Arc::new(TokioSleep),
            roll: Arc::new(RollSettings::from_config(config)),
            homepage: config.homepage.mode,
        }
    }

    /// Production wiring: provider from config, counters on the global recorder.
    pub fn from_config(config: &ServiceConfig) -> Result<Self, FlagError> {
        let flags = FlagClient::new(provider_from_config(&config.flags)?);
        Ok(Self::new(config, flags, RollMetrics::register()))
    }

    pub fn with_delay(mut self, delay: Arc<dyn Delay>) -> Self {
        self.delay = delay;
        self
    }
}

/// HTTP server for the dice service.
pub struct HttpServer {
    router: Router,
    config: ServiceConfig,
}

impl HttpServer {
    pub fn new(config: ServiceConfig, state: AppState) -> Self {
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    pub fn build_router(config: &ServiceConfig, state: AppState) -> Router {
        Router::new()
            .route("/", get(homepage))
            .route(ROLL_PATH, get(rolldice))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
                    .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs))),
            )
    }

    /// Run the server, accepting connections until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            homepage = ?self.config.homepage.mode,
            flag_key = %self.config.flags.key,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }
}

//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the global tracing subscriber
//! - Select pretty or JSON output
//! - Attach the OpenTelemetry layer when span export is enabled
//!
//! # Design Decisions
//! - `RUST_LOG` wins over the configured level
//! - Initialization happens once, before anything else logs

use thiserror::Error;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, ObservabilityConfig};

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("invalid log filter: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),

    #[error("failed to install subscriber: {0}")]
    Init(#[from] tracing_subscriber::util::TryInitError),

    #[error("failed to build OTLP exporter: {0}")]
    Otlp(String),
}

/// Keeps exporters alive; call [`TelemetryGuard::shutdown`] before exit to flush.
#[derive(Debug, Default)]
pub struct TelemetryGuard {
    #[cfg(feature = "otel")]
    provider: Option<opentelemetry_sdk::trace::TracerProvider>,
}

impl TelemetryGuard {
    pub fn shutdown(self) {
        #[cfg(feature = "otel")]
        if let Some(provider) = self.provider {
            if let Err(e) = provider.shutdown() {
                tracing::warn!(error = %e, "Failed to flush spans on shutdown");
            }
        }
        tracing::debug!("Telemetry shut down");
    }
}

/// Build the env filter: `RUST_LOG` if set, else the configured directive.
pub fn env_filter(config: &ObservabilityConfig) -> Result<EnvFilter, TelemetryError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => Ok(EnvFilter::try_new(&config.log_level)?),
    }
}

/// Install the global subscriber.
pub fn init_telemetry(config: &ObservabilityConfig) -> Result<TelemetryGuard, TelemetryError> {
    let json = config.log_format == LogFormat::Json;
    let registry = tracing_subscriber::registry()
        .with(env_filter(config)?)
        .with(json.then(|| fmt::layer().json()))
        .with((!json).then(|| fmt::layer()));

    #[cfg(feature = "otel")]
    let guard = {
        use opentelemetry::trace::TracerProvider as _;

        let provider = crate::observability::tracing::otel::init_provider(config)?;
        let otel_layer = provider
            .as_ref()
            .map(|p| tracing_opentelemetry::layer().with_tracer(p.tracer("rolldice")));
        registry.with(otel_layer).try_init()?;

        if let Some(endpoint) = config.otlp_endpoint.as_deref() {
            tracing::info!(endpoint = %endpoint, "OTLP span export enabled");
        }
        TelemetryGuard { provider }
    };

    #[cfg(not(feature = "otel"))]
    let guard = {
        registry.try_init()?;

        if config.otlp_endpoint.is_some() {
            tracing::warn!("observability.otlp_endpoint is set but the `otel` feature is disabled");
        }
        TelemetryGuard::default()
    };

    Ok(guard)
}

//! Distributed tracing support.
//!
//! # Responsibilities
//! - Create the per-request span used by the HTTP trace layer
//! - Create the `roll` span and its feature-flag attributes
//! - Extract W3C trace context from incoming requests (`otel` feature)
//! - Export spans over OTLP (`otel` feature)
//!
//! # Design Decisions
//! - Spans are plain `tracing` spans; OpenTelemetry is a subscriber layer
//! - The roll span is a child of the request span, which is a child of the
//!   remote parent when one was sent

use axum::{body::Body, http::Request};
use tracing::Span;

use crate::flags::EvaluationContext;

pub const ROLL_SPAN: &str = "roll";

/// Span wrapping one HTTP request. Used as the trace layer's `make_span_with`.
pub fn make_request_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get(crate::http::X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown");

    let span = tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request_id,
    );

    #[cfg(feature = "otel")]
    {
        use tracing_opentelemetry::OpenTelemetrySpanExt;
        span.set_parent(otel::remote_context(request.headers()));
    }

    span
}

/// Open the `roll` span under the current span with the flag attributes set.
/// `roll.value` is recorded later, once the die has been rolled.
pub fn roll_span(
    flag_key: &str,
    provider_name: &str,
    variant: bool,
    evaluation_context: &EvaluationContext,
) -> Span {
    tracing::info_span!(
        "roll",
        feature_flag.key = %flag_key,
        feature_flag.provider_name = %provider_name,
        feature_flag.variant = variant,
        feature_flag.evaluation_context = ?evaluation_context,
        roll.value = tracing::field::Empty,
    )
}

#[cfg(feature = "otel")]
pub mod otel {
    //! OTLP export and W3C propagation.

    use axum::http::HeaderMap;
    use opentelemetry::{
        global,
        propagation::{Extractor, TextMapPropagator},
        Context, KeyValue,
    };
    use opentelemetry_otlp::WithExportConfig;
    use opentelemetry_sdk::{
        propagation::TraceContextPropagator,
        runtime,
        trace::{Config, TracerProvider},
        Resource,
    };

    use crate::config::ObservabilityConfig;
    use crate::observability::logging::TelemetryError;

    const SERVICE_NAME: &str = "service.name";
    const SERVICE_VERSION: &str = "service.version";

    struct HeaderExtractor<'a>(&'a HeaderMap);

    impl Extractor for HeaderExtractor<'_> {
        fn get(&self, key: &str) -> Option<&str> {
            self.0.get(key).and_then(|v| v.to_str().ok())
        }

        fn keys(&self) -> Vec<&str> {
            self.0.keys().map(|k| k.as_str()).collect()
        }
    }

    /// Parent context carried by `traceparent`/`tracestate`, if any.
    pub fn remote_context(headers: &HeaderMap) -> Context {
        TraceContextPropagator::new().extract(&HeaderExtractor(headers))
    }

    /// Build and install the OTLP tracer provider, or `None` when no endpoint
    /// is configured.
    pub fn init_provider(config: &ObservabilityConfig) -> Result<Option<TracerProvider>, TelemetryError> {
        let Some(endpoint) = config.otlp_endpoint.as_deref() else {
            return Ok(None);
        };

        global::set_text_map_propagator(TraceContextPropagator::new());

        let exporter = opentelemetry_otlp::SpanExporter::builder()
            .with_tonic()
            .with_endpoint(endpoint)
            .build()
            .map_err(|e| TelemetryError::Otlp(e.to_string()))?;

        let resource = Resource::new([
            KeyValue::new(SERVICE_NAME, config.service_name.clone()),
            KeyValue::new(SERVICE_VERSION, env!("CARGO_PKG_VERSION")),
        ]);

        let provider = TracerProvider::builder()
            .with_batch_exporter(exporter, runtime::Tokio)
            .with_config(Config::default().with_resource(resource))
            .build();

        global::set_tracer_provider(provider.clone());
        Ok(Some(provider))
    }

}
